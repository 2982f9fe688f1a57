//! Defaults and limits shared by the library and the command line tool.

// ============================================================================
// Pieces
// ============================================================================

/// Default piece length in KiB
pub const DEFAULT_PIECE_LENGTH_KB: u64 = 256;

/// Default piece length in bytes (256 KiB)
pub const DEFAULT_PIECE_LENGTH: u64 = DEFAULT_PIECE_LENGTH_KB * 1024;

// ============================================================================
// I/O
// ============================================================================

/// Chunk size used when reading files for hashing
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

// ============================================================================
// Configuration limits
// ============================================================================

/// Maximum number of ignore patterns accepted in one configuration
pub const MAX_IGNORE_PATTERNS: usize = 256;
