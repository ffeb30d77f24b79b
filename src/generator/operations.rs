//! Handler operations and the per-operation generation parameters

use std::fmt;

/// What a handler hands back in its progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// A single resource model
    Single,
    /// A page of resource models
    Collection,
}

/// The resource handler operations, one stub handler each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Operation {
    /// All operations in the order handlers are declared
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::List,
    ];

    /// Name used in class names (`CreateHandler`) and action constants
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::List => "List",
        }
    }

    /// `CREATE`, `READ`, ... as used by the handler wrapper's action switch
    pub const fn action(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::List => "LIST",
        }
    }

    pub const fn shape(self) -> ReturnShape {
        match self {
            Self::List => ReturnShape::Collection,
            Self::Create | Self::Read | Self::Update | Self::Delete => ReturnShape::Single,
        }
    }

    pub fn handler_class(self) -> String {
        format!("{}Handler", self.name())
    }

    pub fn test_class(self) -> String {
        format!("{}HandlerTest", self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
