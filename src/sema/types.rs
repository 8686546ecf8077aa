use std::collections::HashMap;
use std::rc::Rc;

use crate::frontend::ast::{TypeExpr, TypeExprKind};

/// Canonical semantic type. Identity is by reference: two types are the
/// same type iff their `Rc` handles are pointer-equal, which the interner
/// guarantees for equal type expressions.
#[derive(Debug, PartialEq, Eq)]
pub enum Type {
    None,
    Bool,
    Integer { signed: bool, width: u8 },
    Float { width: u8 },
    Pointer(Rc<Type>),
    Func { ret: Rc<Type>, args: Vec<Rc<Type>> },
}

pub fn same_type(a: &Rc<Type>, b: &Rc<Type>) -> bool {
    Rc::ptr_eq(a, b)
}

/// Maps type expressions to interned semantic types. Pre-populated with
/// the primitive names; pointer and function specs are constructed on
/// demand from their interned components.
pub struct TypeInterner {
    map: HashMap<TypeExpr, Rc<Type>>,
    none: Rc<Type>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let none = Rc::new(Type::None);
        let mut map = HashMap::new();
        map.insert(TypeExpr::name("none"), Rc::clone(&none));
        map.insert(TypeExpr::name("bool"), Rc::new(Type::Bool));
        map.insert(TypeExpr::name("f32"), Rc::new(Type::Float { width: 32 }));
        map.insert(TypeExpr::name("f64"), Rc::new(Type::Float { width: 64 }));
        for width in [8u8, 16, 32, 64] {
            map.insert(
                TypeExpr::name(format!("u{width}")),
                Rc::new(Type::Integer {
                    signed: false,
                    width,
                }),
            );
            map.insert(
                TypeExpr::name(format!("i{width}")),
                Rc::new(Type::Integer {
                    signed: true,
                    width,
                }),
            );
        }
        Self { map, none }
    }

    /// The `none` sentinel handle, substituted wherever typing fails.
    pub fn none_type(&self) -> Rc<Type> {
        Rc::clone(&self.none)
    }

    /// Shared handle for a primitive by name. Falls back to the sentinel
    /// for anything that is not a primitive.
    pub fn primitive(&self, name: &str) -> Rc<Type> {
        self.map
            .get(&TypeExpr::name(name))
            .map(Rc::clone)
            .unwrap_or_else(|| self.none_type())
    }

    /// Install a semantic type under a spec, e.g. an alias name. Returns
    /// the installed handle.
    pub fn install(&mut self, spec: TypeExpr, ty: Rc<Type>) -> Rc<Type> {
        self.map.insert(spec, Rc::clone(&ty));
        ty
    }

    /// Resolve a spec to its interned semantic type, constructing pointer
    /// and function types on demand. `Err` carries the unknown name that
    /// stopped resolution.
    pub fn get(&mut self, spec: &TypeExpr) -> Result<Rc<Type>, String> {
        if let Some(ty) = self.map.get(spec) {
            return Ok(Rc::clone(ty));
        }

        match &spec.kind {
            TypeExprKind::Name(name) => Err(name.clone()),
            TypeExprKind::Pointer(base) => {
                let base_ty = self.get(base)?;
                Ok(self.install(spec.clone(), Rc::new(Type::Pointer(base_ty))))
            }
            TypeExprKind::Func { args, ret } => {
                let ret_ty = self.get(ret)?;
                let mut arg_tys = Vec::with_capacity(args.len());
                for arg in args {
                    arg_tys.push(self.get(arg)?);
                }
                Ok(self.install(
                    spec.clone(),
                    Rc::new(Type::Func {
                        ret: ret_ty,
                        args: arg_tys,
                    }),
                ))
            }
        }
    }

    /// Every name the interner can resolve, for suggestion ranking.
    pub fn known_names(&self) -> Vec<String> {
        self.map
            .keys()
            .filter_map(|spec| match &spec.kind {
                TypeExprKind::Name(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
