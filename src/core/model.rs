// =============================================================================
// MODEL — La capacité d'introspection des types mappables
// =============================================================================
//
// Pour copier un objet sans code écrit à la main, le moteur doit pouvoir
// demander à un type : "quels sont tes membres, de quel type, et comment
// les lire / les écrire ?". C'est la TABLE DES MEMBRES d'un type.
//
// Rust n'a pas de réflexion à l'exécution : la table est générée à la
// compilation par la macro `mappable!` (ou écrite à la main), puis
// consultée à l'exécution à travers des accesseurs typés-effacés.
//
// Chaque membre a une FORME qui décide de la stratégie de copie :
//
//   Value     → scalaire, texte, type valeur quelconque
//   Nullable  → "enveloppe nullable de X" (Option<X>), avec ses primitives
//               présence / unwrap / wrap
//   Object    → type complexe, lui-même mappable (Option<T>, T embarqué,
//               ou liste de T)
//
// EXEMPLE :
//
//   #[derive(Debug, Clone, Default)]
//   struct Person { name: String, age: Option<i32>, address: Option<Address> }
//
//   mappable!(Person {
//       name: value String,
//       age: nullable i32,
//       address: object Address,
//   });
//
// =============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::list::ListView;
use super::types::TypeKey;

/// Un objet que le moteur sait lire et écrire.
///
/// Version "objet" (utilisable en `dyn`) de la table des membres : le moteur
/// ne connaît les valeurs qu'à travers cette interface.
pub trait Mappable: Any {
    fn type_key(&self) -> TypeKey;

    fn describe(&self) -> TypeDescriptor;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Vue "liste ordonnée homogène", si ce type en est une
    fn as_list(&self) -> Option<&dyn ListView> {
        None
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListView> {
        None
    }
}

/// Côté statique de la table des membres.
pub trait Describe: Mappable + Sized {
    fn descriptor() -> TypeDescriptor;

    /// Construction sans paramètre, si le type en a une.
    ///
    /// Par défaut, celle que déclare la table des membres.
    fn constructor() -> Option<Constructor> {
        Self::descriptor().construct
    }
}

/// Construit une instance neuve d'un type mappable
pub type Constructor = fn() -> Box<dyn Mappable>;

/// Constructeur par défaut, pour tout type `Default`
pub fn construct_default<T: Mappable + Default>() -> Box<dyn Mappable> {
    Box::new(T::default())
}

/// Référence paresseuse vers un type mappable : sa clé, sa table, son constructeur.
///
/// La table et le constructeur ne sont résolus qu'à la demande, ce qui
/// permet des types mutuellement récursifs (A contient un B qui contient un A).
#[derive(Clone, Copy)]
pub struct ModelRef {
    pub key: TypeKey,
    pub describe: fn() -> TypeDescriptor,
    constructor: fn() -> Option<Constructor>,
}

impl ModelRef {
    pub fn of<T: Describe>() -> Self {
        ModelRef {
            key: TypeKey::of::<T>(),
            describe: T::descriptor,
            constructor: T::constructor,
        }
    }

    pub fn construct(&self) -> Option<Constructor> {
        (self.constructor)()
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("key", &self.key)
            .field("constructible", &self.construct().is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Accesseurs typés-effacés
// -----------------------------------------------------------------------------

/// Lit (clone) la valeur d'un membre ; `None` si le propriétaire n'est pas du bon type
pub type ReadFn = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync>;

/// Écrit une valeur dans un membre ; `false` si un des types ne correspond pas
pub type WriteFn = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;

pub type BorrowFn = Arc<dyn Fn(&dyn Any) -> Option<&dyn Mappable> + Send + Sync>;

pub type BorrowMutFn = Arc<dyn Fn(&mut dyn Any) -> Option<&mut dyn Mappable> + Send + Sync>;

pub type AssignFn = Arc<dyn Fn(&mut dyn Any, Box<dyn Mappable>) -> bool + Send + Sync>;

// Ces identités forcent l'inférence d'une signature de fermeture
// d'ordre supérieur (la référence rendue vit autant que l'argument).
fn borrow_fn<F>(f: F) -> F
where
    F: Fn(&dyn Any) -> Option<&dyn Mappable> + Send + Sync + 'static,
{
    f
}

fn borrow_mut_fn<F>(f: F) -> F
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Mappable> + Send + Sync + 'static,
{
    f
}

fn reader<O: Any, F: Clone + Any>(get: fn(&O) -> &F) -> ReadFn {
    Arc::new(move |owner: &dyn Any| {
        owner
            .downcast_ref::<O>()
            .map(|o| Box::new(get(o).clone()) as Box<dyn Any>)
    })
}

fn writer<O: Any, F: Any>(get_mut: fn(&mut O) -> &mut F) -> WriteFn {
    Arc::new(move |owner: &mut dyn Any, value: Box<dyn Any>| {
        match (owner.downcast_mut::<O>(), value.downcast::<F>()) {
            (Some(o), Ok(v)) => {
                *get_mut(o) = *v;
                true
            }
            _ => false,
        }
    })
}

/// Les primitives d'une enveloppe nullable : test de présence, unwrap, wrap.
#[derive(Clone)]
pub struct NullableOps {
    /// La valeur (l'enveloppe) contient-elle quelque chose ?
    pub is_present: fn(&dyn Any) -> Option<bool>,
    /// Enveloppe présente → valeur sous-jacente
    pub unwrap: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
    /// Valeur sous-jacente → enveloppe présente
    pub wrap: fn(Box<dyn Any>) -> Option<Box<dyn Any>>,
}

impl NullableOps {
    /// Les primitives de `Option<T>`
    pub fn option<T: Any>() -> Self {
        NullableOps {
            is_present: option_is_present::<T>,
            unwrap: option_unwrap::<T>,
            wrap: option_wrap::<T>,
        }
    }
}

fn option_is_present<T: Any>(value: &dyn Any) -> Option<bool> {
    value.downcast_ref::<Option<T>>().map(Option::is_some)
}

fn option_unwrap<T: Any>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
    let value = value.downcast::<Option<T>>().ok()?;
    (*value).map(|v| Box::new(v) as Box<dyn Any>)
}

fn option_wrap<T: Any>(value: Box<dyn Any>) -> Option<Box<dyn Any>> {
    let value = value.downcast::<T>().ok()?;
    Some(Box::new(Some(*value)) as Box<dyn Any>)
}

/// Accès à un membre complexe sans le cloner : emprunt, emprunt mutable,
/// remplacement par une instance neuve.
#[derive(Clone)]
pub struct ObjectOps {
    /// `None` si le membre est absent
    pub borrow: BorrowFn,
    /// `None` si le membre est absent
    pub borrow_mut: BorrowMutFn,
    pub assign: AssignFn,
}

/// La forme du type déclaré d'un membre.
#[derive(Clone)]
pub enum Shape {
    /// Scalaire, texte, ou tout type sans règle de pont
    Value,
    /// Enveloppe nullable du type `inner`.
    /// `ops` peut manquer pour une enveloppe déclarée à la main.
    Nullable {
        inner: TypeKey,
        ops: Option<NullableOps>,
    },
    /// Type complexe mappable
    Object { model: ModelRef, ops: ObjectOps },
}

impl Shape {
    pub fn is_object(&self) -> bool {
        matches!(self, Shape::Object { .. })
    }

    pub fn nullable_inner(&self) -> Option<TypeKey> {
        match self {
            Shape::Nullable { inner, .. } => Some(*inner),
            _ => None,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Value => write!(f, "Value"),
            Shape::Nullable { inner, ops } => f
                .debug_struct("Nullable")
                .field("inner", inner)
                .field("has_ops", &ops.is_some())
                .finish(),
            Shape::Object { model, .. } => f.debug_struct("Object").field("model", model).finish(),
        }
    }
}

/// Un membre nommé d'un type : son type déclaré, sa forme, ses accesseurs.
#[derive(Clone)]
pub struct Member {
    pub name: &'static str,
    pub ty: TypeKey,
    pub shape: Shape,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
}

impl Member {
    /// Membre scalaire (ou de tout type copié tel quel)
    pub fn value<O: Any, F: Clone + Any>(
        name: &'static str,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self {
        Member {
            name,
            ty: TypeKey::of::<F>(),
            shape: Shape::Value,
            read: Some(reader(get)),
            write: Some(writer(get_mut)),
        }
    }

    /// Membre `Option<F>` : l'enveloppe nullable de `F`
    pub fn nullable<O: Any, F: Clone + Any>(
        name: &'static str,
        get: fn(&O) -> &Option<F>,
        get_mut: fn(&mut O) -> &mut Option<F>,
    ) -> Self {
        Member {
            name,
            ty: TypeKey::of::<Option<F>>(),
            shape: Shape::Nullable {
                inner: TypeKey::of::<F>(),
                ops: Some(NullableOps::option::<F>()),
            },
            read: Some(reader(get)),
            write: Some(writer(get_mut)),
        }
    }

    /// Membre complexe `Option<F>` : peut être absent
    pub fn object<O: Any, F: Describe + Clone>(
        name: &'static str,
        get: fn(&O) -> &Option<F>,
        get_mut: fn(&mut O) -> &mut Option<F>,
    ) -> Self {
        let borrow = borrow_fn(move |owner| {
            owner
                .downcast_ref::<O>()
                .and_then(|o| get(o).as_ref())
                .map(|f| f as &dyn Mappable)
        });
        let borrow_mut = borrow_mut_fn(move |owner| {
            owner
                .downcast_mut::<O>()
                .and_then(|o| get_mut(o).as_mut())
                .map(|f| f as &mut dyn Mappable)
        });
        let assign = move |owner: &mut dyn Any, value: Box<dyn Mappable>| {
            match (owner.downcast_mut::<O>(), value.into_any().downcast::<F>()) {
                (Some(o), Ok(v)) => {
                    *get_mut(o) = Some(*v);
                    true
                }
                _ => false,
            }
        };
        Member {
            name,
            ty: TypeKey::of::<Option<F>>(),
            shape: Shape::Object {
                model: ModelRef::of::<F>(),
                ops: ObjectOps {
                    borrow: Arc::new(borrow),
                    borrow_mut: Arc::new(borrow_mut),
                    assign: Arc::new(assign),
                },
            },
            read: Some(reader(get)),
            write: Some(writer(get_mut)),
        }
    }

    /// Membre complexe `Option<Box<F>>` : pour les modèles récursifs
    /// (une catégorie et sa catégorie parente)
    pub fn boxed<O: Any, F: Describe + Clone>(
        name: &'static str,
        get: fn(&O) -> &Option<Box<F>>,
        get_mut: fn(&mut O) -> &mut Option<Box<F>>,
    ) -> Self {
        let borrow = borrow_fn(move |owner| {
            owner
                .downcast_ref::<O>()
                .and_then(|o| get(o).as_deref())
                .map(|f| f as &dyn Mappable)
        });
        let borrow_mut = borrow_mut_fn(move |owner| {
            owner
                .downcast_mut::<O>()
                .and_then(|o| get_mut(o).as_deref_mut())
                .map(|f| f as &mut dyn Mappable)
        });
        let assign = move |owner: &mut dyn Any, value: Box<dyn Mappable>| {
            match (owner.downcast_mut::<O>(), value.into_any().downcast::<F>()) {
                (Some(o), Ok(v)) => {
                    *get_mut(o) = Some(v);
                    true
                }
                _ => false,
            }
        };
        Member {
            name,
            ty: TypeKey::of::<Option<Box<F>>>(),
            shape: Shape::Object {
                model: ModelRef::of::<F>(),
                ops: ObjectOps {
                    borrow: Arc::new(borrow),
                    borrow_mut: Arc::new(borrow_mut),
                    assign: Arc::new(assign),
                },
            },
            read: Some(reader(get)),
            write: Some(writer(get_mut)),
        }
    }

    /// Membre complexe `F` embarqué : toujours présent
    pub fn embedded<O: Any, F: Describe + Clone>(
        name: &'static str,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self {
        let borrow = borrow_fn(move |owner| {
            owner.downcast_ref::<O>().map(|o| get(o) as &dyn Mappable)
        });
        let borrow_mut = borrow_mut_fn(move |owner| {
            owner.downcast_mut::<O>().map(|o| get_mut(o) as &mut dyn Mappable)
        });
        let assign = move |owner: &mut dyn Any, value: Box<dyn Mappable>| {
            match (owner.downcast_mut::<O>(), value.into_any().downcast::<F>()) {
                (Some(o), Ok(v)) => {
                    *get_mut(o) = *v;
                    true
                }
                _ => false,
            }
        };
        Member {
            name,
            ty: TypeKey::of::<F>(),
            shape: Shape::Object {
                model: ModelRef::of::<F>(),
                ops: ObjectOps {
                    borrow: Arc::new(borrow),
                    borrow_mut: Arc::new(borrow_mut),
                    assign: Arc::new(assign),
                },
            },
            read: Some(reader(get)),
            write: Some(writer(get_mut)),
        }
    }

    /// Déclare le type de ce membre comme enveloppe nullable de `inner`,
    /// sans primitives (à fournir avec `with_nullable_ops`).
    pub fn declare_nullable(mut self, inner: TypeKey) -> Self {
        self.shape = Shape::Nullable { inner, ops: None };
        self
    }

    pub fn with_nullable_ops(mut self, ops: NullableOps) -> Self {
        if let Shape::Nullable { ops: slot, .. } = &mut self.shape {
            *slot = Some(ops);
        }
        self
    }

    /// Membre en lecture seule : jamais écrit par le moteur
    pub fn readonly(mut self) -> Self {
        self.write = None;
        self
    }

    /// Membre en écriture seule : jamais lu comme source
    pub fn writeonly(mut self) -> Self {
        self.read = None;
        self
    }

    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    pub fn reader(&self) -> Option<&ReadFn> {
        self.read.as_ref()
    }

    pub fn writer(&self) -> Option<&WriteFn> {
        self.write.as_ref()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("shape", &self.shape)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.ty)?;
        match (self.is_readable(), self.is_writable()) {
            (true, false) => write!(f, " (lecture seule)"),
            (false, true) => write!(f, " (écriture seule)"),
            (false, false) => write!(f, " (inaccessible)"),
            (true, true) => Ok(()),
        }
    }
}

/// La table des membres d'un type, dans l'ordre de déclaration.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    pub members: Vec<Member>,
    pub construct: Option<Constructor>,
}

impl TypeDescriptor {
    /// Table vide, sans constructeur
    pub fn new(key: TypeKey) -> Self {
        TypeDescriptor {
            key,
            members: Vec::new(),
            construct: None,
        }
    }

    /// Table vide d'un type `Default`, constructible sans paramètre
    pub fn of<T: Mappable + Default>() -> Self {
        TypeDescriptor {
            key: TypeKey::of::<T>(),
            members: Vec::new(),
            construct: Some(construct_default::<T>),
        }
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn find(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type {} {{", self.key)?;
        for member in &self.members {
            writeln!(f, "  {}", member)?;
        }
        write!(f, "}}")
    }
}

/// Déclare un struct comme mappable en générant sa table des membres.
///
/// Genres de membres : `value`, `nullable` (champ `Option<T>`), `object`
/// (champ `Option<T>` avec `T` mappable), `boxed` (champ `Option<Box<T>>`,
/// pour un type qui se contient lui-même), `embedded` (champ `T` mappable,
/// y compris une liste `Vec<T>` ou `Vec<Option<T>>`).
///
/// Une liste déclarée `value` est copiée telle quelle si les types sont
/// identiques, ignorée sinon : pour mapper ses éléments, la déclarer
/// `embedded`.
/// `#[readonly]` / `#[writeonly]` restreignent l'accès au membre.
///
/// Le struct doit implémenter `Default` et chaque type de membre `Clone`.
#[macro_export]
macro_rules! mappable {
    ($owner:ty { $( $(#[$access:ident])? $field:ident : $kind:ident $fty:ty ),* $(,)? }) => {
        impl $crate::core::model::Mappable for $owner {
            fn type_key(&self) -> $crate::core::types::TypeKey {
                $crate::core::types::TypeKey::of::<$owner>()
            }

            fn describe(&self) -> $crate::core::model::TypeDescriptor {
                <$owner as $crate::core::model::Describe>::descriptor()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::core::model::Describe for $owner {
            fn descriptor() -> $crate::core::model::TypeDescriptor {
                $crate::core::model::TypeDescriptor::of::<$owner>()
                    $(
                        .member(
                            $crate::core::model::Member::$kind::<$owner, $fty>(
                                stringify!($field),
                                |o| &o.$field,
                                |o| &mut o.$field,
                            )
                            $( .$access() )?
                        )
                    )*
            }

            fn constructor() -> ::std::option::Option<$crate::core::model::Constructor> {
                ::std::option::Option::Some($crate::core::model::construct_default::<$owner>)
            }
        }
    };
}
