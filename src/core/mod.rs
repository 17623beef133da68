// Core utilities shared across the input subsystems

pub mod math;
