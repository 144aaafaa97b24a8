/*!
 * Tests for reading, editing and saving presentations
 */

use anyhow::Result;
use pptx_translator::errors::DocumentError;
use pptx_translator::presentation::{Presentation, ShapeKind};
use std::io::Read;

use crate::common::{self, FixtureShape, PptxBuilder};

#[test]
fn test_open_shouldListShapesInDocumentOrder() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = PptxBuilder::new()
        .slide(vec![
            FixtureShape::text("Title 1", "Hello"),
            FixtureShape::picture("Picture 2"),
            FixtureShape::table("Table 3", &[&["A", ""], &["B"]]),
            FixtureShape::empty("Rectangle 4"),
        ])
        .write(&dir.path().join("deck.pptx"))?;

    let presentation = Presentation::open(&path)?;
    assert_eq!(presentation.slide_count(), 1);
    assert_eq!(presentation.total_shape_count(), 4);

    let shapes = presentation.slides()[0].shapes();
    let kinds: Vec<ShapeKind> = shapes.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        [ShapeKind::AutoShape, ShapeKind::Picture, ShapeKind::GraphicFrame, ShapeKind::AutoShape]
    );
    assert_eq!(shapes[0].name(), Some("Title 1"));
    assert_eq!(shapes[0].text().as_deref(), Some("Hello"));
    assert_eq!(shapes[1].text(), None);
    assert!(shapes[2].has_text_frame());
    assert_eq!(shapes[2].paragraph_texts(), ["A", "", "B"]);
    assert_eq!(shapes[3].text().as_deref(), Some(""));
    Ok(())
}

#[test]
fn test_open_shouldFollowSlideIdListOrder() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = PptxBuilder::new()
        .slide(vec![FixtureShape::text("T", "First")])
        .slide(vec![FixtureShape::text("T", "Second")])
        .part_numbers(vec![2, 1])
        .write(&dir.path().join("ordered.pptx"))?;

    let presentation = Presentation::open(&path)?;
    let names: Vec<&str> = presentation.slides().iter().map(|s| s.part_name()).collect();
    assert_eq!(names, ["ppt/slides/slide2.xml", "ppt/slides/slide1.xml"]);

    let texts = common::read_shape_texts(&path)?;
    assert_eq!(texts, vec![vec![Some("First".to_string())], vec![Some("Second".to_string())]]);
    Ok(())
}

#[test]
fn test_open_withMultilineText_shouldJoinParagraphs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Body", "one\ntwo\n\nfour")])
        .write(&dir.path().join("lines.pptx"))?;

    let texts = common::read_shape_texts(&path)?;
    assert_eq!(texts[0][0].as_deref(), Some("one\ntwo\n\nfour"));
    Ok(())
}

#[test]
fn test_open_withMissingFile_shouldReturnOpenError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let result = Presentation::open(dir.path().join("missing.pptx"));
    assert!(matches!(result, Err(DocumentError::Open { .. })));
    Ok(())
}

#[test]
fn test_open_withNonZipFile_shouldReturnOpenError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("fake.pptx");
    std::fs::write(&path, "definitely not a zip archive")?;

    let result = Presentation::open(&path);
    assert!(matches!(result, Err(DocumentError::Open { .. })));
    Ok(())
}

#[test]
fn test_open_withoutPresentationPart_shouldReturnMalformed() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("empty.pptx");
    {
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path)?);
        zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())?;
        std::io::Write::write_all(&mut zip, b"hello")?;
        zip.finish()?;
    }

    let result = Presentation::open(&path);
    assert!(matches!(result, Err(DocumentError::Malformed(_))));
    Ok(())
}

#[test]
fn test_saveAfterEdit_shouldPersistTextAndKeepOtherParts() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![
            FixtureShape::text("Title", "Hello"),
            FixtureShape::table("Table", &[&["Cell"]]),
        ])
        .write(&dir.path().join("in.pptx"))?;
    let output = dir.path().join("out").join("translated.pptx");

    let mut presentation = Presentation::open(&input)?;
    {
        let slide = &mut presentation.slides_mut()[0];
        let mut shapes = slide.shapes_mut();
        shapes[0].set_text("Hola")?;
        for mut paragraph in shapes[1].paragraphs_mut() {
            paragraph.set_text("Celda");
        }
    }
    presentation.save(&output)?;

    let texts = common::read_shape_texts(&output)?;
    assert_eq!(texts, vec![vec![Some("Hola".to_string()), Some("Celda".to_string())]]);

    // Untouched parts are copied byte for byte
    let mut archive = zip::ZipArchive::new(std::fs::File::open(&output)?)?;
    let mut app = String::new();
    archive.by_name("docProps/app.xml")?.read_to_string(&mut app)?;
    assert!(app.contains("<Application>Fixture</Application>"));
    assert!(archive.by_name("[Content_Types].xml").is_ok());

    // The input is unchanged
    assert_eq!(common::read_shape_texts(&input)?[0][0].as_deref(), Some("Hello"));
    Ok(())
}

#[test]
fn test_saveAfterEdit_shouldKeepRunFormatting() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Title", "Hello")])
        .write(&dir.path().join("in.pptx"))?;
    let output = dir.path().join("out.pptx");

    let mut presentation = Presentation::open(&input)?;
    presentation.slides_mut()[0].shapes_mut()[0].set_text("Hola & adiós")?;
    presentation.save(&output)?;

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&output)?)?;
    let mut slide = String::new();
    archive.by_name("ppt/slides/slide1.xml")?.read_to_string(&mut slide)?;
    assert!(slide.contains(r#"<a:rPr lang="en-US" b="1"/>"#));
    assert!(slide.contains("Hola &amp; adiós"));
    Ok(())
}

#[test]
fn test_save_overInput_shouldFailAndLeaveInputIntact() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Title", "Hello")])
        .write(&dir.path().join("deck.pptx"))?;
    let before = std::fs::read(&input)?;

    let mut presentation = Presentation::open(&input)?;
    presentation.slides_mut()[0].shapes_mut()[0].set_text("Hola")?;
    let result = presentation.save(&input);

    assert!(matches!(result, Err(DocumentError::Persist { .. })));
    assert_eq!(std::fs::read(&input)?, before);
    Ok(())
}

#[test]
fn test_save_toDirectoryPath_shouldFailWithoutLeftovers() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Title", "Hello")])
        .write(&dir.path().join("deck.pptx"))?;
    let target = dir.path().join("occupied");
    std::fs::create_dir(&target)?;

    let presentation = Presentation::open(&input)?;
    let result = presentation.save(&target);

    assert!(matches!(result, Err(DocumentError::Persist { .. })));
    assert!(target.is_dir());
    let entries: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 2, "temporary file should be cleaned up");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_save_toNewPath_shouldUseDefaultFileMode() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Title", "Hello")])
        .write(&dir.path().join("deck.pptx"))?;
    // A plainly created file shows the mode the umask allows
    let reference = dir.path().join("reference");
    std::fs::File::create(&reference)?;
    let expected = std::fs::metadata(&reference)?.permissions().mode() & 0o777;

    let output = dir.path().join("translated.pptx");
    Presentation::open(&input)?.save(&output)?;

    assert_eq!(std::fs::metadata(&output)?.permissions().mode() & 0o777, expected);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_save_overExistingOutput_shouldKeepItsPermissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = common::create_temp_dir()?;
    let input = PptxBuilder::new()
        .slide(vec![FixtureShape::text("Title", "Hello")])
        .write(&dir.path().join("deck.pptx"))?;
    let output = dir.path().join("translated.pptx");
    std::fs::write(&output, b"old")?;
    std::fs::set_permissions(&output, std::fs::Permissions::from_mode(0o640))?;

    Presentation::open(&input)?.save(&output)?;

    assert_eq!(std::fs::metadata(&output)?.permissions().mode() & 0o777, 0o640);
    assert_ne!(std::fs::read(&output)?, b"old");
    Ok(())
}
