//! Timer demos: TIM2 update interrupt and TIM3 two-channel PWM

pub mod interrupt;
pub mod pwm;

pub use interrupt::TimerInterruptDemo;
pub use pwm::{Ramp, TimerPwm};
