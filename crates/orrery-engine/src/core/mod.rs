pub mod frame_loop;
pub mod ray;
pub mod rng;
pub mod scene;
pub mod time;
