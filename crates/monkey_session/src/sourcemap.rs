use monkey_diagnostic::sources::{Cached, Sources};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

#[derive(Default, Debug, Clone)]
pub struct SourceMap {
    inner: Vec<Cached<Source>>,
}

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub source: String,
}

impl Source {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

impl SourceMap {
    pub fn insert(&mut self, source: Source) -> SourceId {
        let id = SourceId(self.inner.len());
        self.inner.push(Cached::new(source));
        id
    }

    pub fn source_str(&self, id: SourceId) -> Option<&str> {
        self.get_source(id).map(|cached| cached.as_source().source.as_str())
    }
}

impl Sources for SourceMap {
    type SourceId = SourceId;
    type Source = Source;

    fn get_source(&self, id: Self::SourceId) -> Option<&Cached<Self::Source>> {
        self.inner.get(id.0)
    }
}

impl monkey_diagnostic::sources::Source for Source {
    fn name_str(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&std::path::Path> {
        None
    }

    fn source_str(&self) -> &str {
        &self.source
    }
}
