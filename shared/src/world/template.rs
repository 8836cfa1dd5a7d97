/// Static data about a base object, as served by the game-data database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRecord {
    pub base_id: u32,
    pub category: String,
    pub name: String,
}

/// Read access to the static template database.
///
/// `None` means the template does not belong to `category`; a lookup
/// failure is never fatal to callers.
pub trait TemplateLookup: Send + Sync {
    fn lookup(&self, base_id: u32, category: &str) -> Option<TemplateRecord>;
}
