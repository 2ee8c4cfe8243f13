macro_rules! error {
    ($($arg:tt)*) => {{
        ::log::error!(target: "tensor_seq", $($arg)*);
    }}
}
macro_rules! trace {
    ($($arg:tt)*) => {{
        ::log::trace!(target: "tensor_seq", $($arg)*);
    }}
}
pub(crate) use error;
pub(crate) use trace;
