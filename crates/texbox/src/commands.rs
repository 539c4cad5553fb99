//! Command Registry
//!
//! Maps command names to atom constructors. A parser resolves `\frac{a}{b}`
//! by laying out the arguments as atoms and invoking the registered
//! constructor with them. Each registry is an ordinary value: a parsing
//! session owns one and may extend it without affecting any other session.

use crate::atoms::{
    ArrowDirection, AtomRef, BreakMarkAtom, FBoxAtom, FencedAtom, FractionAtom, NthRoot,
    OverUnderDelimiter, PhantomAtom, ScaleAtom, ShadowAtom, SmashedAtom, SpaceAtom, XArrowAtom,
};
use crate::error::{LayoutError, MathResult};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

// =============================================================================
// Registry
// =============================================================================

/// Builds an atom from the arguments of a command, optional ones first
pub type Constructor = Box<dyn Fn(Vec<AtomRef>) -> MathResult<AtomRef> + Send + Sync>;

struct CommandInfo {
    /// Mandatory arguments
    argc: usize,
    /// Optional arguments, passed before the mandatory ones when present
    optional: usize,
    build: Constructor,
}

/// Registered commands of one parsing session
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandInfo>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CommandRegistry").field("commands", &names).finish()
    }
}

impl CommandRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command taking exactly `argc` arguments, replacing any
    /// previous command of the same name
    pub fn register<F>(&mut self, name: &str, argc: usize, build: F)
    where
        F: Fn(Vec<AtomRef>) -> MathResult<AtomRef> + Send + Sync + 'static,
    {
        self.register_optional(name, argc, 0, build);
    }

    /// Register a command taking `argc` arguments plus up to `optional` more
    pub fn register_optional<F>(&mut self, name: &str, argc: usize, optional: usize, build: F)
    where
        F: Fn(Vec<AtomRef>) -> MathResult<AtomRef> + Send + Sync + 'static,
    {
        self.commands.insert(
            name.to_string(),
            CommandInfo {
                argc,
                optional,
                build: Box::new(build),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Mandatory and optional argument counts of a command
    pub fn arguments(&self, name: &str) -> Option<(usize, usize)> {
        self.commands.get(name).map(|info| (info.argc, info.optional))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Build the atom for `name` from its arguments.
    ///
    /// `line` and `column` locate the command in the formula source and are
    /// reported with any error.
    pub fn invoke(&self, name: &str, args: Vec<AtomRef>, line: usize, column: usize) -> MathResult<AtomRef> {
        let parse_error = |message: String| LayoutError::FormulaParse {
            command: name.to_string(),
            line,
            column,
            message,
        };
        let info = self
            .commands
            .get(name)
            .ok_or_else(|| parse_error("unknown command".to_string()))?;

        let given = args.len();
        if given < info.argc || given > info.argc + info.optional {
            let expected = match info.optional {
                0 => info.argc.to_string(),
                n => format!("{} to {}", info.argc, info.argc + n),
            };
            return Err(parse_error(format!("expected {expected} arguments, got {given}")));
        }
        trace!(command = name, arguments = given, "invoking command");
        (info.build)(args)
    }

    /// A registry holding the built-in commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_structures(&mut registry);
        register_boxes(&mut registry);
        register_spacing(&mut registry);
        registry
    }
}

/// Move exactly `N` arguments out of `args`
fn take<const N: usize>(args: Vec<AtomRef>) -> MathResult<[AtomRef; N]> {
    args.try_into().map_err(|args: Vec<AtomRef>| {
        LayoutError::InvalidStructure(format!("expected {N} arguments, got {}", args.len()))
    })
}

// =============================================================================
// Built-in Commands
// =============================================================================

fn register_structures(registry: &mut CommandRegistry) {
    registry.register("frac", 2, |args| {
        let [num, denom] = take(args)?;
        Ok(Box::new(FractionAtom::new(num, denom)))
    });
    registry.register("binom", 2, |args| {
        let [n, k] = take(args)?;
        let fraction = FractionAtom::new(n, k).without_bar();
        Ok(Box::new(FencedAtom::new(Some("lbrack"), Box::new(fraction), Some("rbrack"))))
    });
    registry.register_optional("sqrt", 1, 1, |args| match args.len() {
        1 => {
            let [base] = take(args)?;
            Ok(Box::new(NthRoot::sqrt(base)))
        }
        _ => {
            let [index, base] = take(args)?;
            Ok(Box::new(NthRoot::new(base, index)))
        }
    });
    registry.register_optional("overbrace", 1, 1, |args| {
        let mut args = args.into_iter();
        let script = (args.len() > 1).then(|| args.next()).flatten();
        let base = args.next().ok_or_else(|| LayoutError::InvalidStructure("overbrace without base".into()))?;
        Ok(Box::new(OverUnderDelimiter::overbrace(base, script)))
    });
    registry.register_optional("underbrace", 1, 1, |args| {
        let mut args = args.into_iter();
        let script = (args.len() > 1).then(|| args.next()).flatten();
        let base = args.next().ok_or_else(|| LayoutError::InvalidStructure("underbrace without base".into()))?;
        Ok(Box::new(OverUnderDelimiter::underbrace(base, script)))
    });
    for (name, direction) in [
        ("xleftarrow", ArrowDirection::Left),
        ("xrightarrow", ArrowDirection::Right),
        ("xleftrightarrow", ArrowDirection::LeftRight),
    ] {
        // \xrightarrow[under]{over}
        registry.register_optional(name, 1, 1, move |args| {
            let mut args = args.into_iter();
            let under = (args.len() > 1).then(|| args.next()).flatten();
            let over = args.next();
            Ok(Box::new(XArrowAtom::new(direction, over, under)))
        });
    }
}

fn register_boxes(registry: &mut CommandRegistry) {
    registry.register("phantom", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(PhantomAtom::new(base)))
    });
    registry.register("hphantom", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(PhantomAtom::with_dimensions(base, true, false, false)))
    });
    registry.register("vphantom", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(PhantomAtom::with_dimensions(base, false, true, true)))
    });
    registry.register("smash", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(SmashedAtom::new(base)))
    });
    registry.register("fbox", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(FBoxAtom::new(base)))
    });
    registry.register("shadowbox", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(ShadowAtom::new(base)))
    });
    registry.register("reflectbox", 1, |args| {
        let [base] = take(args)?;
        Ok(Box::new(ScaleAtom::reflect(base)))
    });
}

fn register_spacing(registry: &mut CommandRegistry) {
    let spaces: [(&str, fn() -> SpaceAtom); 6] = [
        (",", SpaceAtom::thin),
        (":", SpaceAtom::medium),
        (";", SpaceAtom::thick),
        ("!", SpaceAtom::negative_thin),
        ("quad", SpaceAtom::quad),
        ("allowbreakspace", || SpaceAtom::thin().breakable()),
    ];
    for (name, space) in spaces {
        registry.register(name, 0, move |_| Ok(Box::new(space())));
    }
    registry.register("allowbreak", 0, |_| Ok(Box::new(BreakMarkAtom)));
    registry.register("linebreak", 0, |_| Ok(Box::new(BreakMarkAtom)));
}

// =============================================================================
// Tests
// =============================================================================
