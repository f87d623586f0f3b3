#![feature(portable_simd)]

pub mod extraction;
pub mod physics;
pub mod renderer;
pub mod utilities;
