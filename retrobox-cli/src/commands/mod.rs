pub(crate) mod config;
pub(crate) mod execute;
pub(crate) mod list;
pub(crate) mod refresh;
pub(crate) mod rows;
pub(crate) mod transform;
