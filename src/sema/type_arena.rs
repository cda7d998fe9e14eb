// src/sema/type_arena.rs
//
// Interned type algebra using TypeId handles for O(1) equality.
//
// - TypeId: u32 handle to an interned type (Copy, trivial Eq/Hash)
// - TypeArena: per-compilation storage with automatic deduplication
// - The error type lives at index 0 and absorbs every operation, so one
//   diagnostic never cascades into its dependent expressions.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::frontend::ast::BinaryOp;

/// Handle to an interned type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    /// Get the raw index (for debugging/serialization)
    pub fn index(self) -> u32 {
        self.0
    }
}

/// SmallVec for parameter type lists - inline up to 4
pub type TypeIdVec = SmallVec<[TypeId; 4]>;

/// Internal representation of interned types.
///
/// Children are TypeId handles, not recursive values, so arrays and
/// function types stay flat and hashable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum InternedType {
    Error,
    Integer,
    Float,
    Boolean,
    Character,
    Void,
    Array { size: u32, elem: TypeId },
    Function { params: TypeIdVec, ret: TypeId },
}

/// Pre-interned primitive and special types for O(1) access
#[derive(Debug, Clone, Copy)]
pub struct BasicTypes {
    pub error: TypeId,
    pub integer: TypeId,
    pub float: TypeId,
    pub boolean: TypeId,
    pub character: TypeId,
    pub void: TypeId,
}

/// Per-compilation type arena with automatic interning/deduplication.
#[derive(Debug)]
pub struct TypeArena {
    /// Interned types, indexed by TypeId
    types: Vec<InternedType>,
    /// Deduplication map
    intern_map: FxHashMap<InternedType, TypeId>,
    /// Pre-interned basics for O(1) access
    pub basics: BasicTypes,
}

impl TypeArena {
    /// Create a new TypeArena with pre-interned basic types
    pub fn new() -> Self {
        let mut arena = Self {
            types: Vec::new(),
            intern_map: FxHashMap::default(),
            basics: BasicTypes {
                error: TypeId(0),
                integer: TypeId(0),
                float: TypeId(0),
                boolean: TypeId(0),
                character: TypeId(0),
                void: TypeId(0),
            },
        };

        // Error must be first (index 0) for the is_error() check
        arena.basics.error = arena.intern(InternedType::Error);
        debug_assert_eq!(arena.basics.error.0, 0);

        arena.basics.integer = arena.intern(InternedType::Integer);
        arena.basics.float = arena.intern(InternedType::Float);
        arena.basics.boolean = arena.intern(InternedType::Boolean);
        arena.basics.character = arena.intern(InternedType::Character);
        arena.basics.void = arena.intern(InternedType::Void);

        arena
    }

    /// Intern a type, returning the existing TypeId if already interned
    fn intern(&mut self, ty: InternedType) -> TypeId {
        let next_id = TypeId(self.types.len() as u32);
        *self.intern_map.entry(ty.clone()).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    /// Get the InternedType for a TypeId
    pub fn get(&self, id: TypeId) -> &InternedType {
        &self.types[id.0 as usize]
    }

    // ========================================================================
    // Basic accessors
    // ========================================================================

    pub fn error(&self) -> TypeId {
        self.basics.error
    }
    pub fn integer(&self) -> TypeId {
        self.basics.integer
    }
    pub fn float(&self) -> TypeId {
        self.basics.float
    }
    pub fn boolean(&self) -> TypeId {
        self.basics.boolean
    }
    pub fn character(&self) -> TypeId {
        self.basics.character
    }
    pub fn void(&self) -> TypeId {
        self.basics.void
    }

    // ========================================================================
    // Compound type builders - intern on construction
    // ========================================================================

    /// Create an array type. Error elements absorb.
    pub fn array(&mut self, size: u32, elem: TypeId) -> TypeId {
        if self.is_error(elem) {
            return self.error();
        }
        self.intern(InternedType::Array { size, elem })
    }

    /// Create a function type. The return type may be void.
    pub fn function(&mut self, params: impl Into<TypeIdVec>, ret: TypeId) -> TypeId {
        self.intern(InternedType::Function {
            params: params.into(),
            ret,
        })
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    pub fn is_error(&self, id: TypeId) -> bool {
        id.0 == 0 // Error is always at index 0
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        id == self.basics.integer
    }

    pub fn is_float(&self, id: TypeId) -> bool {
        id == self.basics.float
    }

    pub fn is_boolean(&self, id: TypeId) -> bool {
        id == self.basics.boolean
    }

    pub fn is_character(&self, id: TypeId) -> bool {
        id == self.basics.character
    }

    pub fn is_void(&self, id: TypeId) -> bool {
        id == self.basics.void
    }

    /// int, float, bool or char
    pub fn is_primitive(&self, id: TypeId) -> bool {
        matches!(
            self.get(id),
            InternedType::Integer
                | InternedType::Float
                | InternedType::Boolean
                | InternedType::Character
        )
    }

    /// int or float
    pub fn is_numeric(&self, id: TypeId) -> bool {
        matches!(self.get(id), InternedType::Integer | InternedType::Float)
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.get(id), InternedType::Array { .. })
    }

    pub fn is_function(&self, id: TypeId) -> bool {
        matches!(self.get(id), InternedType::Function { .. })
    }

    /// True for a function type whose return type is void
    pub fn is_void_function(&self, id: TypeId) -> bool {
        match self.get(id) {
            InternedType::Function { ret, .. } => self.is_void(*ret),
            _ => false,
        }
    }

    // ========================================================================
    // Unwrap helpers
    // ========================================================================

    /// Element type of an array
    pub fn array_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            InternedType::Array { elem, .. } => Some(*elem),
            _ => None,
        }
    }

    /// Declared size of an array
    pub fn array_size(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            InternedType::Array { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Parameter types of a function
    pub fn func_params(&self, id: TypeId) -> Option<&TypeIdVec> {
        match self.get(id) {
            InternedType::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Number of declared parameters of a function
    pub fn num_params(&self, id: TypeId) -> Option<usize> {
        self.func_params(id).map(|p| p.len())
    }

    /// Type of the i-th declared parameter
    pub fn param_at(&self, id: TypeId, i: usize) -> Option<TypeId> {
        self.func_params(id).and_then(|p| p.get(i)).copied()
    }

    /// Return type of a function
    pub fn func_return(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            InternedType::Function { ret, .. } => Some(*ret),
            _ => None,
        }
    }

    // ========================================================================
    // Type relations
    // ========================================================================

    /// Whether a value of `src` can be stored into a location of `dst`.
    ///
    /// Identical types copy (arrays included, interning makes shape
    /// equality handle equality), int widens into float, error absorbs.
    /// Function types never copy.
    pub fn copyable(&self, dst: TypeId, src: TypeId) -> bool {
        if self.is_error(dst) || self.is_error(src) {
            return true;
        }
        if self.is_function(dst) || self.is_function(src) {
            return false;
        }
        if dst == src {
            return true;
        }
        self.is_float(dst) && self.is_integer(src)
    }

    /// Whether two operand types can be compared with `op`.
    ///
    /// Equality takes same-type primitives or an int/float mix; ordering
    /// takes two numerics or two characters. Arrays and functions are
    /// never comparable. Error absorbs.
    pub fn comparable(&self, a: TypeId, b: TypeId, op: BinaryOp) -> bool {
        if self.is_error(a) || self.is_error(b) {
            return true;
        }
        let numeric_mix = self.is_numeric(a) && self.is_numeric(b);
        if op.is_equality() {
            (self.is_primitive(a) && a == b) || numeric_mix
        } else {
            numeric_mix || (self.is_character(a) && self.is_character(b))
        }
    }

    /// Size of a type in TAC cells: primitives take one, arrays take
    /// size × element size.
    pub fn size_in_cells(&self, id: TypeId) -> usize {
        match self.get(id) {
            InternedType::Array { size, elem } => *size as usize * self.size_in_cells(*elem),
            _ => 1,
        }
    }

    /// Display a type for diagnostics
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            InternedType::Error => "<error>".to_string(),
            InternedType::Integer => "int".to_string(),
            InternedType::Float => "float".to_string(),
            InternedType::Boolean => "bool".to_string(),
            InternedType::Character => "char".to_string(),
            InternedType::Void => "void".to_string(),
            InternedType::Array { size, elem } => {
                format!("array[{}] of {}", size, self.display(*elem))
            }
            InternedType::Function { params, ret } => {
                let parts: Vec<String> = params.iter().map(|&p| self.display(p)).collect();
                format!("({}) -> {}", parts.join(", "), self.display(*ret))
            }
        }
    }
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn type_id_is_copy() {
        let arena = TypeArena::new();
        let id = arena.integer();
        let id2 = id; // Copy
        assert_eq!(id, id2);
    }

    #[test]
    fn error_is_at_index_zero() {
        let arena = TypeArena::new();
        assert_eq!(arena.basics.error.index(), 0);
        assert!(arena.is_error(arena.error()));
        assert!(!arena.is_error(arena.integer()));
    }

    #[test]
    fn basics_are_distinct() {
        let arena = TypeArena::new();
        assert_ne!(arena.integer(), arena.float());
        assert_ne!(arena.boolean(), arena.character());
        assert_ne!(arena.void(), arena.error());
    }

    #[test]
    fn interning_deduplicates() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let a = arena.array(4, int);
        let b = arena.array(4, int);
        assert_eq!(a, b);

        let f1 = arena.function(smallvec![int], arena.void());
        let f2 = arena.function(smallvec![int], arena.void());
        assert_eq!(f1, f2);
    }

    #[test]
    fn different_shapes_different_ids() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let float = arena.float();
        assert_ne!(arena.array(4, int), arena.array(5, int));
        assert_ne!(arena.array(4, int), arena.array(4, float));
    }

    #[test]
    fn error_absorbs_array_construction() {
        let mut arena = TypeArena::new();
        let err = arena.error();
        let arr = arena.array(3, err);
        assert!(arena.is_error(arr));
    }

    #[test]
    fn predicates() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let arr = arena.array(2, int);
        let func = arena.function(TypeIdVec::new(), arena.void());

        assert!(arena.is_primitive(int));
        assert!(arena.is_primitive(arena.character()));
        assert!(!arena.is_primitive(arr));
        assert!(!arena.is_primitive(arena.void()));

        assert!(arena.is_numeric(arena.float()));
        assert!(!arena.is_numeric(arena.boolean()));

        assert!(arena.is_array(arr));
        assert!(arena.is_function(func));
        assert!(arena.is_void_function(func));
    }

    #[test]
    fn non_void_function_is_not_void_function() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let func = arena.function(TypeIdVec::new(), int);
        assert!(!arena.is_void_function(func));
        assert_eq!(arena.func_return(func), Some(int));
    }

    #[test]
    fn function_introspection() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let float = arena.float();
        let func = arena.function(smallvec![int, float], arena.boolean());

        assert_eq!(arena.num_params(func), Some(2));
        assert_eq!(arena.param_at(func, 0), Some(int));
        assert_eq!(arena.param_at(func, 1), Some(float));
        assert_eq!(arena.param_at(func, 2), None);
    }

    #[test]
    fn copyable_rules() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let float = arena.float();
        let arr4 = arena.array(4, int);
        let arr5 = arena.array(5, int);
        let func = arena.function(TypeIdVec::new(), arena.void());

        assert!(arena.copyable(int, int));
        assert!(arena.copyable(float, int)); // widening
        assert!(!arena.copyable(int, float));
        assert!(arena.copyable(arr4, arr4)); // identical shape
        assert!(!arena.copyable(arr4, arr5));
        assert!(!arena.copyable(func, func)); // functions never copy
        assert!(arena.copyable(int, arena.error())); // absorption
        assert!(arena.copyable(arena.error(), arr4));
    }

    #[test]
    fn comparable_rules() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        let float = arena.float();
        let ch = arena.character();
        let boolean = arena.boolean();
        let arr = arena.array(4, int);

        // Equality
        assert!(arena.comparable(int, int, BinaryOp::Eq));
        assert!(arena.comparable(int, float, BinaryOp::Ne));
        assert!(arena.comparable(boolean, boolean, BinaryOp::Eq));
        assert!(arena.comparable(ch, ch, BinaryOp::Eq));
        assert!(!arena.comparable(boolean, int, BinaryOp::Eq));
        assert!(!arena.comparable(arr, arr, BinaryOp::Eq));

        // Ordering
        assert!(arena.comparable(int, float, BinaryOp::Lt));
        assert!(arena.comparable(ch, ch, BinaryOp::Le));
        assert!(!arena.comparable(boolean, boolean, BinaryOp::Lt));
        assert!(!arena.comparable(ch, int, BinaryOp::Gt));

        // Absorption
        assert!(arena.comparable(arena.error(), arr, BinaryOp::Lt));
    }

    #[test]
    fn size_in_cells() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        assert_eq!(arena.size_in_cells(int), 1);
        assert_eq!(arena.size_in_cells(arena.float()), 1);
        let arr = arena.array(10, int);
        assert_eq!(arena.size_in_cells(arr), 10);
    }

    #[test]
    fn display_types() {
        let mut arena = TypeArena::new();
        let int = arena.integer();
        assert_eq!(arena.display(int), "int");
        let arr = arena.array(4, int);
        assert_eq!(arena.display(arr), "array[4] of int");
        let func = arena.function(smallvec![int], arena.void());
        assert_eq!(arena.display(func), "(int) -> void");
    }
}
