//! Sealing of the public traits that must only be implemented inside this crate.

macro_rules! private_decl {
    () => {
        /// This trait is sealed and can not be implemented outside of this crate.
        #[doc(hidden)]
        fn __private(&self, _: crate::private::Internal);
    };
}

macro_rules! private_impl {
    () => {
        fn __private(&self, _: crate::private::Internal) {}
    };
}

#[doc(hidden)]
pub struct Internal;
