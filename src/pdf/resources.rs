use lopdf::{Dictionary, Document, Object};

/// Where a page keeps its Resources entry.
enum ResourcesSlot {
    Referenced((u32, u16)),
    Inline(Dictionary),
    Missing,
}

/// Merge font and XObject entries into a page's resources dictionary.
///
/// Template pages usually hold Resources as an indirect reference;
/// appended pages start with no Resources at all. Existing entries are
/// preserved, ours are added on top.
pub fn update_page_resources(
    doc: &mut Document,
    page_id: (u32, u16),
    fonts: &[(&str, (u32, u16))],
    xobjects: &Dictionary,
) {
    let slot = doc
        .get_object(page_id)
        .ok()
        .and_then(|page| page.as_dict().ok())
        .map(|dict| match dict.get(b"Resources") {
            Ok(Object::Reference(id)) => ResourcesSlot::Referenced(*id),
            Ok(Object::Dictionary(d)) => ResourcesSlot::Inline(d.clone()),
            _ => ResourcesSlot::Missing,
        })
        .unwrap_or(ResourcesSlot::Missing);

    let mut resources = match &slot {
        ResourcesSlot::Referenced(id) => doc
            .get_dictionary(*id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        ResourcesSlot::Inline(d) => d.clone(),
        ResourcesSlot::Missing => Dictionary::new(),
    };

    if !fonts.is_empty() {
        // The font dictionary itself may be an indirect reference
        let mut font_resources = match resources.get(b"Font") {
            Ok(Object::Reference(font_dict_id)) => doc
                .get_dictionary(*font_dict_id)
                .cloned()
                .unwrap_or_else(|_| Dictionary::new()),
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        };
        for (name, font_id) in fonts {
            font_resources.set(*name, Object::Reference(*font_id));
        }
        resources.set("Font", Object::Dictionary(font_resources));
    }

    if !xobjects.is_empty() {
        let mut xobject_resources = match resources.get(b"XObject") {
            Ok(Object::Reference(xobj_id)) => doc
                .get_dictionary(*xobj_id)
                .cloned()
                .unwrap_or_else(|_| Dictionary::new()),
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        };
        for (key, value) in xobjects.iter() {
            xobject_resources.set(key.to_vec(), value.clone());
        }
        resources.set("XObject", Object::Dictionary(xobject_resources));
    }

    match slot {
        ResourcesSlot::Referenced(id) => {
            if let Ok(existing) = doc.get_dictionary_mut(id) {
                *existing = resources;
            }
        }
        ResourcesSlot::Inline(_) | ResourcesSlot::Missing => {
            if let Ok(page) = doc.get_dictionary_mut(page_id) {
                page.set("Resources", Object::Dictionary(resources));
            }
        }
    }
}
