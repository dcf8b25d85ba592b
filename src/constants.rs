//! Application-wide constants
//!
//! Keyword tokens for the OBJ8 and .snd text formats plus shared numeric
//! thresholds, providing a single source of truth for the parsers and
//! serializers.

/// X-Plane OBJ8 geometry tokens
pub mod obj {
    /// Vertex table record tag (followed by x, y, z and normal/UV fields)
    pub const VERTEX_TAG: &str = "VT";

    /// Triangle block marker; its first numeric token selects the vertex
    /// table offset for subsequent manipulators
    pub const TRIS_TAG: &str = "TRIS";

    /// Prefix shared by all manipulator declarations
    pub const MANIP_PREFIX: &str = "ATTR_manip_";

    /// Manipulator variant that declares no interaction
    pub const MANIP_NONE: &str = "ATTR_manip_none";
}

/// FMOD sound attachment (.snd) record keywords
pub mod snd {
    /// Opens one sound attachment block
    pub const BEGIN_MARKER: &str = "BEGIN_SOUND_ATTACHMENT";

    /// Closes one sound attachment block
    pub const END_MARKER: &str = "END_SOUND_ATTACHMENT";

    /// FMOD event path for the block
    pub const EVENT_NAME: &str = "EVENT_NAME";

    /// Position by aircraft coordinates (three fixed-point fields)
    pub const VEH_XYZ: &str = "VEH_XYZ";

    /// Position by named airframe part (mutually exclusive with VEH_XYZ)
    pub const VEH_PART: &str = "VEH_PART";

    pub const EVENT_POLYPHONIC: &str = "EVENT_POLYPHONIC";
    pub const EVENT_ALLOWED_FOR_AI: &str = "EVENT_ALLOWED_FOR_AI";
    pub const PARAM_DREF_IDX: &str = "PARAM_DREF_IDX";

    pub const EVENT_START_COND: &str = "EVENT_START_COND";
    pub const EVENT_END_COND: &str = "EVENT_END_COND";
    pub const EVENT_CMND_DOWN: &str = "EVENT_CMND_DOWN";
    pub const EVENT_CMND_UP: &str = "EVENT_CMND_UP";
    pub const EVENT_CMND_HOLD_STOP: &str = "EVENT_CMND_HOLD_STOP";
    pub const EVENT_CMND_HOLD_CUE: &str = "EVENT_CMND_HOLD_CUE";
    pub const EVENT_CMND_CUE: &str = "EVENT_CMND_CUE";
    pub const EVENT_CMND_ONCE: &str = "EVENT_CMND_ONCE";
    pub const CUE_TRIGGER_COND: &str = "CUE_TRIGGER_COND";
    pub const EVENT_AUTO_END: &str = "EVENT_AUTO_END_FROM_START_COND";
}

/// Coordinate update thresholds
pub mod update {
    /// Per-axis delta below which a coordinate change is treated as noise
    /// (suppresses 0.000 vs -0.000 and negligible geometry jitter)
    pub const XYZ_TOLERANCE: f64 = 0.001;
}

/// Configuration file location constants
pub mod config {
    /// Directory under the user config dir
    pub const APP_DIR: &str = "xsnd";

    /// Config filename
    pub const FILENAME: &str = "config.toml";
}
