/*!
 * Translation of individual text segments.
 *
 * - `client`: `TranslationClient`, a translator bound to one language pair
 *   with retries, request pacing and caching
 * - `cache`: caching of translations within a session
 */

pub use self::cache::TranslationCache;
pub use self::client::{ClientSettings, TranslationClient};

pub mod cache;
pub mod client;
