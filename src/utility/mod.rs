pub mod rate_gate;
