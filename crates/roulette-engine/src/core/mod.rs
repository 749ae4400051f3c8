pub mod angle;
pub mod integrator;
pub mod time;
