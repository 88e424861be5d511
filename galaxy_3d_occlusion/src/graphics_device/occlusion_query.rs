/// OcclusionQuery trait - handle to an in-flight GPU occlusion query

/// An occlusion query that has been submitted to the GPU.
///
/// The answer is the number of fragments of the tested geometry that
/// passed the depth test. Zero means the tested volume is fully hidden.
pub trait OcclusionQuery: Send {
    /// Whether the result is available without blocking.
    fn is_answer_ready(&self) -> bool;

    /// Number of fragments that passed the depth test.
    ///
    /// Blocks until the driver has produced the result.
    fn fragment_count(&self) -> u64;
}
