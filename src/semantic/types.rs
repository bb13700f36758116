use crate::ast::Type;

/// Size and classification of a type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: &'static str,
    pub size: usize,
    pub is_primitive: bool,
}

impl TypeInfo {
    pub fn of(ty: Type) -> Self {
        let size = match ty {
            Type::Int | Type::Float | Type::Bool => 4,
            Type::String => 8,
            Type::Void => 0,
        };
        Self {
            name: ty.name(),
            size,
            is_primitive: true,
        }
    }
}

/// Two types are compatible when their names are equal.
pub fn compatible(a: Type, b: Type) -> bool {
    TypeInfo::of(a).name == TypeInfo::of(b).name
}
