/*!
 * Tests for file utilities
 */

use anyhow::Result;
use pptx_translator::file_utils::FileManager;
use std::path::PathBuf;

use crate::common;

#[test]
fn test_isPresentationFile_shouldIgnoreCase() {
    assert!(FileManager::is_presentation_file("deck.pptx"));
    assert!(FileManager::is_presentation_file("DECK.PPTX"));
    assert!(!FileManager::is_presentation_file("deck.ppt"));
    assert!(!FileManager::is_presentation_file("deck"));
}

#[test]
fn test_withPresentationExtension_shouldAppendOnlyWhenMissing() {
    assert_eq!(
        FileManager::with_presentation_extension(PathBuf::from("out/deck")),
        PathBuf::from("out/deck.pptx")
    );
    assert_eq!(
        FileManager::with_presentation_extension(PathBuf::from("out/deck.pptx")),
        PathBuf::from("out/deck.pptx")
    );
    assert_eq!(
        FileManager::with_presentation_extension(PathBuf::from("notes.txt")),
        PathBuf::from("notes.txt.pptx")
    );
}

#[test]
fn test_ensureParentDir_shouldCreateMissingDirectories() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let target = dir.path().join("a").join("b").join("deck.pptx");

    let parent = FileManager::ensure_parent_dir(&target)?;
    assert_eq!(parent, dir.path().join("a").join("b"));
    assert!(FileManager::dir_exists(&parent));
    assert!(!FileManager::file_exists(&target));
    Ok(())
}

#[test]
fn test_ensureParentDir_withBareFileName_shouldUseCurrentDir() -> Result<()> {
    assert_eq!(FileManager::ensure_parent_dir("deck.pptx")?, PathBuf::from("."));
    Ok(())
}
