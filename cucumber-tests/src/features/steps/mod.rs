pub mod guard_steps;
pub mod render_steps;
pub mod role_steps;
