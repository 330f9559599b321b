pub(crate) mod background;
pub(crate) mod pool;
pub(crate) mod scheduler;
pub(crate) mod sequence;
