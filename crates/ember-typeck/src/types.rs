//! The type representation and its structural interner.
//!
//! Anonymous type shapes (pointers, tuples, struct/union/enum type
//! expressions not tied to a declaration) are deduplicated structurally: two
//! occurrences of `*s32` intern to the same [`TypeId`]. Named declarations
//! (`struct`, `enum`, `union`) are nominal — each declaration gets exactly
//! one `TypeId`, reserved before its fields are resolved so a
//! self-referential field (`next: *Node`) can name its own declaration's
//! id before the declaration finishes.

use rustc_hash::FxHashMap;

use ember_parser::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    F32,
    F64,
    Unit,
    String,
    Bool,
}

impl Builtin {
    pub fn from_text(text: &str) -> Option<Builtin> {
        use Builtin::*;
        Some(match text {
            "u8" => U8,
            "s8" => S8,
            "u16" => U16,
            "s16" => S16,
            "u32" => U32,
            "s32" => S32,
            "u64" => U64,
            "s64" => S64,
            "f32" => F32,
            "f64" => F64,
            "unit" => Unit,
            "string" => String,
            "bool" => Bool,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        use Builtin::*;
        match self {
            U8 => "u8",
            S8 => "s8",
            U16 => "u16",
            S16 => "s16",
            U32 => "u32",
            S32 => "s32",
            U64 => "u64",
            S64 => "s64",
            F32 => "f32",
            F64 => "f64",
            Unit => "unit",
            String => "string",
            Bool => "bool",
        }
    }

    pub fn is_integer(self) -> bool {
        use Builtin::*;
        matches!(self, U8 | S8 | U16 | S16 | U32 | S32 | U64 | S64)
    }

    pub fn is_numeric(self) -> bool {
        use Builtin::*;
        self.is_integer() || matches!(self, F32 | F64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRepr {
    Builtin(Builtin),
    Ptr(TypeId),
    Tuple(Vec<TypeId>),
    /// A struct's field list, in declaration order. `decl` is `Some` for a
    /// named `struct` declaration, `None` for an anonymous `struct { .. }`
    /// type expression (e.g. an inline union alternative payload).
    Struct {
        decl: Option<NodeId>,
        fields: Vec<(String, TypeId)>,
    },
    /// A tagged union's alternatives; each alternative optionally carries a
    /// payload type.
    TaggedUnion {
        decl: Option<NodeId>,
        alts: Vec<(String, Option<TypeId>)>,
    },
    Enum {
        decl: Option<NodeId>,
        alts: Vec<String>,
    },
    /// A placeholder reserved for a named declaration before its body has
    /// been resolved, so self-referential fields can name it.
    Pending,
    /// Sentinel produced once a diagnostic has already been raised about
    /// this expression; every operation involving it is silently accepted
    /// so one error doesn't cascade into a wall of follow-on ones.
    Error,
}

#[derive(Debug, Default)]
pub struct Types {
    reprs: Vec<TypeRepr>,
    interned: FxHashMap<TypeRepr, TypeId>,
    /// Canonical id for each named declaration (`struct`/`enum`/`union`).
    pub decl_type: FxHashMap<NodeId, TypeId>,
}

impl Types {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TypeId) -> &TypeRepr {
        &self.reprs[id.0 as usize]
    }

    /// Structurally dedup an anonymous type shape, or look up its existing
    /// id. Never use this for a named declaration's own id — those are
    /// reserved up front with [`Types::reserve`] and never structurally
    /// shared even if two decls happen to have identical fields.
    pub fn intern(&mut self, repr: TypeRepr) -> TypeId {
        if let Some(id) = self.interned.get(&repr) {
            return *id;
        }
        let id = TypeId(self.reprs.len() as u32);
        self.interned.insert(repr.clone(), id);
        self.reprs.push(repr);
        id
    }

    pub fn builtin(&mut self, b: Builtin) -> TypeId {
        self.intern(TypeRepr::Builtin(b))
    }

    pub fn error(&mut self) -> TypeId {
        self.intern(TypeRepr::Error)
    }

    /// Reserve a fresh nominal id for `decl`, recorded as [`TypeRepr::Pending`]
    /// until [`Types::fill`] commits its real representation.
    pub fn reserve(&mut self, decl: NodeId) -> TypeId {
        let id = TypeId(self.reprs.len() as u32);
        self.reprs.push(TypeRepr::Pending);
        self.decl_type.insert(decl, id);
        id
    }

    pub fn fill(&mut self, id: TypeId, repr: TypeRepr) {
        self.reprs[id.0 as usize] = repr;
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeRepr::Error)
    }

    /// Follow at most one pointer indirection, mirroring the checker's
    /// auto-deref-at-most-one rule for field access and indexing.
    pub fn auto_deref(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeRepr::Ptr(inner) => *inner,
            _ => id,
        }
    }

    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeRepr::Builtin(b) => b.name().to_string(),
            TypeRepr::Ptr(inner) => format!("*{}", self.display(*inner)),
            TypeRepr::Tuple(elems) => {
                let parts: Vec<String> = elems.iter().map(|e| self.display(*e)).collect();
                format!("({})", parts.join(", "))
            }
            TypeRepr::Struct { fields, .. } => {
                let parts: Vec<String> =
                    fields.iter().map(|(n, t)| format!("{n}: {}", self.display(*t))).collect();
                format!("struct {{ {} }}", parts.join(", "))
            }
            TypeRepr::TaggedUnion { alts, .. } => {
                let parts: Vec<String> = alts
                    .iter()
                    .map(|(n, t)| match t {
                        Some(t) => format!("{n}({})", self.display(*t)),
                        None => n.clone(),
                    })
                    .collect();
                format!("union {{ {} }}", parts.join(", "))
            }
            TypeRepr::Enum { alts, .. } => format!("enum {{ {} }}", alts.join(", ")),
            TypeRepr::Pending => "<pending>".to_string(),
            TypeRepr::Error => "<error>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_anonymous_shapes_intern_to_one_id() {
        let mut types = Types::new();
        let a = types.builtin(Builtin::S32);
        let p1 = types.intern(TypeRepr::Ptr(a));
        let p2 = types.intern(TypeRepr::Ptr(a));
        assert_eq!(p1, p2);
    }

    #[test]
    fn different_shapes_get_different_ids() {
        let mut types = Types::new();
        let a = types.builtin(Builtin::S32);
        let b = types.builtin(Builtin::U8);
        assert_ne!(a, b);
    }

    #[test]
    fn reserved_decl_type_is_stable_through_fill() {
        let mut types = Types::new();
        let decl = NodeId(0);
        let id = types.reserve(decl);
        assert!(matches!(types.get(id), TypeRepr::Pending));
        types.fill(id, TypeRepr::Struct { decl: Some(decl), fields: vec![] });
        assert_eq!(types.decl_type[&decl], id);
        assert!(matches!(types.get(id), TypeRepr::Struct { .. }));
    }

    #[test]
    fn auto_deref_follows_one_pointer_only() {
        let mut types = Types::new();
        let inner = types.builtin(Builtin::S32);
        let ptr = types.intern(TypeRepr::Ptr(inner));
        assert_eq!(types.auto_deref(ptr), inner);
        assert_eq!(types.auto_deref(inner), inner);
    }
}
