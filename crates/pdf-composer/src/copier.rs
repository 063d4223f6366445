use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Bound on page-tree depth when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Copies objects from one document into another, assigning fresh ids.
pub(crate) struct ObjectCopier<'a> {
    source_doc: &'a Document,
    target_doc: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    pub(crate) fn new(source_doc: &'a Document, target_doc: &'a mut Document) -> Self {
        Self {
            source_doc,
            target_doc,
            id_map: HashMap::new(),
        }
    }

    /// Copies the given pages, detached from the source page tree.
    ///
    /// Every page id is reserved before any page body is copied, so
    /// annotations that point at sibling pages resolve to the copies instead
    /// of dragging the source tree in through the sibling's `/Parent`.
    pub(crate) fn copy_pages(&mut self, page_ids: &[ObjectId]) -> Result<Vec<ObjectId>, lopdf::Error> {
        let reserved: Vec<ObjectId> = page_ids
            .iter()
            .map(|&page_id| self.reserve(page_id))
            .collect();

        for (&page_id, &new_id) in page_ids.iter().zip(&reserved) {
            let page = self.detached_page(page_id)?;
            let new_page = self.remap_references(Object::Dictionary(page))?;
            self.fill(new_id, new_page)?;
        }
        Ok(reserved)
    }

    /// Deep copies an object and everything it references, copying each
    /// source object at most once.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Registered before recursing so reference cycles terminate.
        let new_id = self.reserve(source_id);
        let obj = self.source_doc.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;
        self.fill(new_id, new_obj)?;

        Ok(new_id)
    }

    fn reserve(&mut self, source_id: ObjectId) -> ObjectId {
        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);
        new_id
    }

    fn fill(&mut self, target_id: ObjectId, obj: Object) -> Result<(), lopdf::Error> {
        match self.target_doc.objects.get_mut(&target_id) {
            Some(slot) => {
                *slot = obj;
                Ok(())
            }
            None => Err(lopdf::Error::ObjectNotFound(target_id)),
        }
    }

    /// The page dictionary with inherited attributes made explicit and its
    /// `/Parent` link removed.
    fn detached_page(&self, page_id: ObjectId) -> Result<Dictionary, lopdf::Error> {
        let mut page = self.source_doc.get_dictionary(page_id)?.clone();
        for key in INHERITABLE_PAGE_KEYS {
            if !page.has(key)
                && let Some(value) = inherited_attribute(self.source_doc, &page, key)
            {
                page.set(key, value);
            }
        }
        page.remove(b"Parent");
        Ok(page)
    }

    /// Replaces every `Object::Reference` with the id of its copy.
    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => {
                let new_id = self.copy_object(id)?;
                Ok(Object::Reference(new_id))
            }
            Object::Array(arr) => {
                let new_arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(new_arr))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }
}

fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}
