use crate::copier::ObjectCopier;
use crate::error::ComposerError;
use log::{debug, info};
use lopdf::{Document, Object, ObjectId, dictionary};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A document with an empty page tree and a catalog, ready to be merged into.
pub fn empty_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0_i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Appends every page of `source` to the end of `target`'s page tree.
///
/// Pages are copied together with the objects they reference (content
/// streams, resources, fonts, annotations) under fresh object ids. Outlines
/// and named destinations of `source` are not carried over.
///
/// Returns the number of pages appended.
pub fn merge_documents(target: &mut Document, source: &Document) -> Result<usize, ComposerError> {
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }

    let copied_page_ids = ObjectCopier::new(source, target).copy_pages(&source_pages)?;

    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;
    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;

    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let original_count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(copied_page_ids.iter().copied().map(Object::Reference));

    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", original_count + copied_page_ids.len() as i64);

    for page_id in &copied_page_ids {
        if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(*page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(copied_page_ids.len())
}

/// Concatenates the pages of `sources`, in order, into a new PDF at `output`.
///
/// Every source is checked before anything is written, and the result is
/// staged in a temporary file next to `output` that only replaces it once
/// fully written. A failed merge therefore never leaves a partial file at
/// `output`. An existing file at `output` is overwritten.
///
/// Returns the page count of the merged document.
pub fn merge_files<P: AsRef<Path>>(sources: &[P], output: &Path) -> Result<usize, ComposerError> {
    if sources.is_empty() {
        return Err(ComposerError::NoSources);
    }
    if let Some(missing) = sources.iter().map(AsRef::as_ref).find(|p| !p.is_file()) {
        return Err(ComposerError::NotFound(missing.to_path_buf()));
    }

    let mut merged = empty_document();
    for source in sources {
        let path = source.as_ref();
        let document = Document::load(path).map_err(|source| ComposerError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let appended = merge_documents(&mut merged, &document)?;
        debug!("Appended {} page(s) from {}", appended, path.display());
    }

    let page_count = merged.get_pages().len();
    write_replacing(&mut merged, output)?;
    info!(
        "Merged {} PDF(s) into {} ({} pages)",
        sources.len(),
        output.display(),
        page_count
    );
    Ok(page_count)
}

fn write_replacing(document: &mut Document, output: &Path) -> Result<(), ComposerError> {
    let write_error = |source: std::io::Error| ComposerError::Write {
        path: output.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| write_error(std::io::Error::other(e.to_string())))?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // The staged file is removed on drop if anything below fails.
    let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(&bytes).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(output).map_err(|e| write_error(e.error))?;
    Ok(())
}
