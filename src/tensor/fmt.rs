use super::Tensor;

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut st = f.debug_struct("Tensor");
        st.field("scalar_type", &self.scalar_type());
        st.field("sizes", &self.sizes());
        cfg_if::cfg_if! { if #[cfg(feature = "ndarray")] {
            let sizes = ndarray::IxDyn(self.sizes());
            crate::tensor::dispatch_buffer!(self.buffer(), |data| match ndarray::ArrayView::from_shape(
                sizes,
                &data[..]
            ) {
                Ok(array) => st.field("data", &array),
                Err(_) => st.field("data", &&data[..]),
            });
        } else {
            crate::tensor::dispatch_buffer!(self.buffer(), |data| st.field("data", &&data[..]));
        } }
        st.finish()
    }
}
