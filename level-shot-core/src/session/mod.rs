pub mod auto_capture;
