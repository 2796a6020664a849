pub mod netra;
