/**
 * API Error Types
 *
 * This module defines the error taxonomy for the REST API and its
 * conversion into HTTP responses.
 *
 * Every per-request failure is represented as an `ApiError` and rendered
 * as a flat JSON body `{"error": <message>, "code": <stable code>}` with
 * the corresponding status. Side-effect failures (notification inserts,
 * push delivery) are never mapped to responses; they are logged and
 * swallowed at the dispatch site.
 */

pub mod conversion;
pub mod types;

pub use types::ApiError;
