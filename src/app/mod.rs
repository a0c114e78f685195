pub mod install_use_case;
pub mod ports;
