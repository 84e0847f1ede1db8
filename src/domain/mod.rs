// Domain layer: entities, rule parameters and ports. No knowledge of config files or the CLI.

pub mod ids;
pub mod model;
pub mod policy;
pub mod ports;
