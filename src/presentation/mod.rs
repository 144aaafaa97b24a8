/*!
 * PowerPoint (`.pptx`) package handling.
 *
 * A presentation is an OPC zip package. Opening reads every part into
 * memory, resolves the slide parts in presentation order through
 * `ppt/presentation.xml` and its relationships, and parses each slide into
 * an editable XML tree. Saving writes every untouched part back as read
 * and re-serializes the slides.
 *
 * - `xml`: owned element tree used for slide parts
 * - `shape`: shapes, paragraphs and text assignment
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;
use crate::file_utils::FileManager;

pub mod shape;
pub mod xml;

pub use shape::{LINE_BREAK, ParagraphMut, Shape, ShapeKind, ShapeMut};
pub use xml::{XmlDocument, XmlElement, XmlNode};

const PACKAGE_RELATIONSHIPS: &str = "_rels/.rels";
const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";
const SLIDE_REL: &str = "/slide";

/// One part of the package, stored as read
#[derive(Debug, Clone)]
struct PackagePart {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// A slide and the index of the part it was read from
#[derive(Debug, Clone)]
pub struct Slide {
    part_index: usize,
    part_name: String,
    document: XmlDocument,
}

impl Slide {
    /// Name of the package part, e.g. `ppt/slides/slide1.xml`
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    fn shape_tree(&self) -> Option<&XmlElement> {
        self.document.root.find_path(&["cSld", "spTree"])
    }

    /// Shapes of the slide in document order
    pub fn shapes(&self) -> Vec<Shape<'_>> {
        self.shape_tree()
            .map(|tree| {
                tree.elements()
                    .filter(|e| shape::is_shape_element(e))
                    .map(Shape::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn shapes_mut(&mut self) -> Vec<ShapeMut<'_>> {
        match self.document.root.find_path_mut(&["cSld", "spTree"]) {
            Some(tree) => tree
                .elements_mut()
                .filter(|e| shape::is_shape_element(e))
                .map(ShapeMut::new)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes().len()
    }
}

/// An opened presentation
#[derive(Debug, Clone)]
pub struct Presentation {
    source: PathBuf,
    parts: Vec<PackagePart>,
    slides: Vec<Slide>,
}

impl Presentation {
    /// Open a presentation from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let open_error = |message: String| DocumentError::Open {
            path: path.display().to_string(),
            message,
        };

        let file = File::open(path).map_err(|e| open_error(e.to_string()))?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| open_error(e.to_string()))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| open_error(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(|e| open_error(e.to_string()))?;
            parts.push(PackagePart {
                name: entry.name().to_string(),
                data,
                compression: entry.compression(),
            });
        }

        let slides = load_slides(&parts)?;
        debug!("Opened {:?}: {} parts, {} slides", path, parts.len(), slides.len());

        Ok(Self {
            source: path.to_path_buf(),
            parts,
            slides,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Number of shapes across all slides
    pub fn total_shape_count(&self) -> usize {
        self.slides.iter().map(Slide::shape_count).sum()
    }

    /// Write the presentation to `path`
    ///
    /// The package is written to a temporary file next to the destination
    /// and renamed over it once complete. The source file is never
    /// overwritten.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let persist_error = |message: String| DocumentError::Persist {
            path: path.display().to_string(),
            message,
        };

        if same_file(&self.source, path) {
            return Err(persist_error("output path is the input file".to_string()));
        }

        let parent = FileManager::ensure_parent_dir(path).map_err(|e| persist_error(format!("{:#}", e)))?;

        let mut slide_data = vec![None; self.parts.len()];
        for slide in &self.slides {
            slide_data[slide.part_index] = Some(slide.document.to_bytes()?);
        }

        let mut temp = new_temp_file(&parent, path).map_err(|e| persist_error(e.to_string()))?;
        {
            let mut writer = ZipWriter::new(BufWriter::new(temp.as_file_mut()));
            for (part, replaced) in self.parts.iter().zip(&slide_data) {
                let options = SimpleFileOptions::default().compression_method(writable_method(part.compression));
                writer
                    .start_file(part.name.as_str(), options)
                    .map_err(|e| persist_error(e.to_string()))?;
                let data = replaced.as_deref().unwrap_or(&part.data);
                writer.write_all(data).map_err(|e| persist_error(e.to_string()))?;
            }
            let mut inner = writer.finish().map_err(|e| persist_error(e.to_string()))?;
            inner.flush().map_err(|e| persist_error(e.to_string()))?;
        }

        temp.persist(path).map_err(|e| persist_error(e.error.to_string()))?;
        debug!("Saved presentation to {:?}", path);
        Ok(())
    }
}

/// Temporary output file with the mode a plainly created file would get
///
/// An existing destination keeps its permissions; a new one gets 0666 less the umask.
#[cfg(unix)]
fn new_temp_file(dir: &Path, destination: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::Builder::new()
        .permissions(Permissions::from_mode(0o666))
        .tempfile_in(dir)?;
    if let Some(existing) = std::fs::metadata(destination).ok().filter(|m| m.is_file()) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(temp)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path, _destination: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    tempfile::NamedTempFile::new_in(dir)
}

fn writable_method(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn find_part<'a>(parts: &'a [PackagePart], name: &str) -> Option<(usize, &'a PackagePart)> {
    parts
        .iter()
        .enumerate()
        .find(|(_, part)| part.name.eq_ignore_ascii_case(name))
}

/// Relationships part for a given part, e.g. `ppt/_rels/presentation.xml.rels`
fn relationships_part_name(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_name),
    }
}

/// Resolve a relationship target against the directory of its source part
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let base = source_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    let mut segments: Vec<String> = Vec::new();
    for component in Path::new(base).join(target).components() {
        match component {
            Component::ParentDir => {
                segments.pop();
            }
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            _ => {}
        }
    }
    segments.join("/")
}

/// (Id, Type, Target) triples of a relationships part
fn read_relationships(parts: &[PackagePart], rels_name: &str) -> Result<Vec<(String, String, String)>, DocumentError> {
    let Some((_, part)) = find_part(parts, rels_name) else {
        return Ok(Vec::new());
    };
    let document = XmlDocument::parse(&part.data, rels_name)?;
    Ok(document
        .root
        .elements()
        .filter(|e| e.is("Relationship"))
        .filter_map(|rel| {
            Some((
                rel.attribute("Id")?.to_string(),
                rel.attribute("Type").unwrap_or_default().to_string(),
                rel.attribute("Target")?.to_string(),
            ))
        })
        .collect())
}

fn load_slides(parts: &[PackagePart]) -> Result<Vec<Slide>, DocumentError> {
    let presentation_part = read_relationships(parts, PACKAGE_RELATIONSHIPS)?
        .into_iter()
        .find(|(_, rel_type, _)| rel_type.ends_with(OFFICE_DOCUMENT_REL))
        .map(|(_, _, target)| resolve_target("", &target))
        .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());

    let (_, part) = find_part(parts, &presentation_part).ok_or_else(|| {
        DocumentError::Malformed(format!("missing presentation part {}", presentation_part))
    })?;
    let presentation = XmlDocument::parse(&part.data, &presentation_part)?;

    let relationships = read_relationships(parts, &relationships_part_name(&presentation_part))?;

    let slide_ids: Vec<&str> = presentation
        .root
        .child("sldIdLst")
        .map(|list| {
            list.elements()
                .filter(|e| e.is("sldId"))
                .filter_map(|e| e.prefixed_attribute("id"))
                .collect()
        })
        .unwrap_or_default();

    let mut slides = Vec::with_capacity(slide_ids.len());
    for rel_id in slide_ids {
        let (_, _, target) = relationships
            .iter()
            .find(|(id, rel_type, _)| id == rel_id && rel_type.ends_with(SLIDE_REL))
            .ok_or_else(|| DocumentError::Malformed(format!("slide relationship {} not found", rel_id)))?;

        let part_name = resolve_target(&presentation_part, target);
        let (part_index, part) = find_part(parts, &part_name)
            .ok_or_else(|| DocumentError::Malformed(format!("missing slide part {}", part_name)))?;
        let document = XmlDocument::parse(&part.data, &part_name)?;

        slides.push(Slide {
            part_index,
            part_name,
            document,
        });
    }

    Ok(slides)
}
