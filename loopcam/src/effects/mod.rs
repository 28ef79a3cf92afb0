pub(crate) mod blur;
pub(crate) mod flicker;
pub(crate) mod grain;
pub(crate) mod mask;
pub(crate) mod wobble;
