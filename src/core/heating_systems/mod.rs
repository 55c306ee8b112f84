pub mod boiler;
pub mod chp;
pub mod emitters;
pub mod heat_network;
pub mod heat_pump;
pub mod instant_elec_heater;
