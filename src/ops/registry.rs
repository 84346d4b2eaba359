//! The closed set of supported task-store operations
//!
//! One descriptor per `todo` subcommand. The registry is the single source
//! of truth for argument reconciliation and command rendering: adding an
//! operation means adding one descriptor here, nothing else.

/// How a parameter's value is interpreted before execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRole {
    /// Passed through as-is
    Plain,
    /// A single task reference, resolved against the snapshot
    TaskRef,
    /// A list of task references, each resolved against the snapshot
    TaskRefList,
}

/// How a parameter is rendered into the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Bare positional argument after the verb
    Positional,
    /// Space-joined positional list (task IDs)
    PositionalList,
    /// `--name value`
    Flag,
    /// `--name v1 v2 ...`
    MultiFlag,
    /// `--name`, emitted only when the value is true
    Switch,
}

/// One canonical parameter of an operation
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub role: ValueRole,
    pub render: RenderStyle,
}

const fn plain(name: &'static str, required: bool, render: RenderStyle) -> ParamSpec {
    ParamSpec {
        name,
        required,
        role: ValueRole::Plain,
        render,
    }
}

const fn flag(name: &'static str) -> ParamSpec {
    plain(name, false, RenderStyle::Flag)
}

const fn switch(name: &'static str) -> ParamSpec {
    plain(name, false, RenderStyle::Switch)
}

/// Immutable registry entry for one operation
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    /// Unique operation name (the key the model must emit)
    pub name: &'static str,
    /// Subcommand words after the `todo` binary ("" for the bare listing)
    pub verb: &'static str,
    /// Canonical parameters in declaration order
    pub params: &'static [ParamSpec],
    /// Inherently destructive operations default to requiring confirmation
    pub destructive: bool,
}

impl OperationDescriptor {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|p| p.name)
    }
}

const OPERATIONS: &[OperationDescriptor] = &[
    OperationDescriptor {
        name: "list",
        verb: "",
        params: &[
            plain("context", false, RenderStyle::Positional),
            switch("flat"),
        ],
        destructive: false,
    },
    OperationDescriptor {
        name: "add",
        verb: "add",
        params: &[
            plain("title", true, RenderStyle::Positional),
            flag("deadline"),
            flag("start"),
            flag("context"),
            flag("priority"),
            ParamSpec {
                name: "depends_on",
                required: false,
                role: ValueRole::TaskRefList,
                render: RenderStyle::MultiFlag,
            },
            flag("period"),
            switch("front"),
        ],
        destructive: false,
    },
    OperationDescriptor {
        name: "done",
        verb: "done",
        params: &[ParamSpec {
            name: "ids",
            required: true,
            role: ValueRole::TaskRefList,
            render: RenderStyle::PositionalList,
        }],
        destructive: false,
    },
    OperationDescriptor {
        name: "task",
        verb: "task",
        params: &[
            ParamSpec {
                name: "id",
                required: true,
                role: ValueRole::TaskRef,
                render: RenderStyle::Positional,
            },
            flag("deadline"),
            flag("start"),
            flag("context"),
            flag("priority"),
            flag("title"),
            ParamSpec {
                name: "depends_on",
                required: false,
                role: ValueRole::TaskRefList,
                render: RenderStyle::MultiFlag,
            },
            flag("period"),
            switch("front"),
        ],
        destructive: false,
    },
    OperationDescriptor {
        name: "history",
        verb: "history",
        params: &[],
        destructive: false,
    },
    OperationDescriptor {
        name: "search",
        verb: "search",
        params: &[
            plain("term", true, RenderStyle::Positional),
            flag("context"),
            switch("done"),
            switch("undone"),
            flag("before"),
            flag("after"),
            switch("case"),
        ],
        destructive: false,
    },
    OperationDescriptor {
        name: "rm",
        verb: "rm",
        params: &[ParamSpec {
            name: "ids",
            required: true,
            role: ValueRole::TaskRefList,
            render: RenderStyle::PositionalList,
        }],
        destructive: true,
    },
    OperationDescriptor {
        name: "ping",
        verb: "ping",
        params: &[ParamSpec {
            name: "ids",
            required: true,
            role: ValueRole::TaskRefList,
            render: RenderStyle::PositionalList,
        }],
        destructive: false,
    },
    OperationDescriptor {
        name: "purge",
        verb: "purge",
        params: &[switch("force"), flag("before")],
        destructive: true,
    },
    OperationDescriptor {
        name: "ctx",
        verb: "ctx",
        params: &[
            plain("context", true, RenderStyle::Positional),
            flag("priority"),
            flag("visibility"),
            flag("name"),
        ],
        destructive: false,
    },
    OperationDescriptor {
        name: "mv",
        verb: "mv",
        params: &[
            plain("source", true, RenderStyle::Positional),
            plain("destination", true, RenderStyle::Positional),
        ],
        destructive: true,
    },
    OperationDescriptor {
        name: "rmctx",
        verb: "rmctx",
        params: &[
            plain("context", true, RenderStyle::Positional),
            switch("force"),
        ],
        destructive: true,
    },
    OperationDescriptor {
        name: "future",
        verb: "future",
        params: &[],
        destructive: false,
    },
    OperationDescriptor {
        name: "location",
        verb: "--location",
        params: &[],
        destructive: false,
    },
];

/// Look up an operation by its canonical name
pub fn lookup(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|op| op.name == name)
}

/// All registered operations, in declaration order
pub fn all() -> &'static [OperationDescriptor] {
    OPERATIONS
}
