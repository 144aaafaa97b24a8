/*!
 * Tests for translation cache functionality
 */

use pptx_translator::translation::cache::TranslationCache;

#[test]
fn test_cache_new_withDisabled_shouldNeverReturnEntries() {
    let cache = TranslationCache::new(false);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "en", "fr").is_none());
    assert!(cache.is_empty());
    assert!(!cache.is_enabled());
}

#[test]
fn test_cache_store_withEnabledCache_shouldStoreTranslation() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert_eq!(cache.get("hello", "en", "fr"), Some("bonjour".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_get_withDifferentLanguages_shouldReturnNone() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    assert!(cache.get("hello", "de", "fr").is_none());
    assert!(cache.get("hello", "en", "es").is_none());
}

#[test]
fn test_cache_stats_shouldCountHitsAndMisses() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");

    cache.get("hello", "en", "fr");
    cache.get("hello", "en", "fr");
    cache.get("goodbye", "en", "fr");

    let (hits, misses, rate) = cache.stats();
    assert_eq!(hits, 2);
    assert_eq!(misses, 1);
    assert!((rate - 2.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_cache_clear_shouldResetEntriesAndStats() {
    let cache = TranslationCache::new(true);
    cache.store("hello", "en", "fr", "bonjour");
    cache.get("hello", "en", "fr");

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats(), (0, 0, 0.0));
}

#[test]
fn test_cache_clone_shouldShareStorage() {
    let cache = TranslationCache::default();
    let clone = cache.clone();
    clone.store("title", "en", "de", "Titel");

    assert_eq!(cache.get("title", "en", "de"), Some("Titel".to_string()));
}
