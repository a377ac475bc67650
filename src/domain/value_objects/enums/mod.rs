pub mod repeat_modes;
