mod file_mount;
mod session_flow;
