use driftfs_substrate::LinkTag;

/// Roles of the substrate links the engine creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkKind {
    /// Parent path anchor to child path anchor.
    PathChild,
    /// Path anchor to the identity address of a file in that directory.
    PathFile,
    /// Metadata revision to its successor.
    Revision,
}

impl LinkKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::PathChild => "path-child",
            Self::PathFile => "path-file",
            Self::Revision => "revision",
        }
    }

    pub(crate) fn tag(self) -> LinkTag {
        LinkTag::from(self.as_str())
    }
}
