// Analysis module - the block-level DSP pipeline
//
// Everything between raw samples and a classified, smoothed feature record
// lives here:
//
// - window: coefficient tables for the analysis frame
// - features: extraction pipeline (transform, spectral, temporal, pitch,
//   mfcc, chroma) producing one FeatureVector per block
// - history: exponential smoothing plus the bounded record history
// - classifier: the three-strategy voting ensemble
// - training: the FIFO-evicted labeled example store
//
// The engine (crate::engine) owns the shared state and sequences these
// pieces per call.

pub mod classifier;
pub mod features;
pub mod history;
pub mod training;
pub mod window;
