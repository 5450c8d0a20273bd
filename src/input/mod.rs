mod controls;

#[allow(unused_imports)]
pub use controls::{KaleidoscopeControls, Phase};
