pub mod internal_gains;
pub mod thermal_network;
pub mod ventilation;
pub mod window;
