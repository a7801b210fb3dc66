mod topology;

pub use topology::ITreeTopology;
