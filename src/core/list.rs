// =============================================================================
// LIST — La capacité "collection ordonnée homogène"
// =============================================================================
//
// Quand la source ET la cible d'un mapping sont des listes, le moteur ne
// copie pas membre à membre : il mappe ÉLÉMENT PAR ÉLÉMENT, dans l'ordre,
// en ajoutant à la fin de la liste cible.
//
// Pour cela il a besoin de savoir, pour chaque liste :
//   - le type déclaré de ses éléments (pour résoudre la paire une seule fois)
//   - lire l'élément i (absent = trou)
//   - ajouter un élément (ou un trou) à la fin
//
// Trois implémentations :
//   Vec<T>          → liste typée statiquement, sans trou ; un élément
//                     absent ne peut pas y être ajouté
//   Vec<Option<T>>  → liste typée statiquement, `None` = élément absent
//   DynList         → liste typée-effacée, type d'élément optionnel
//
// =============================================================================

use std::any::Any;

use super::model::{construct_default, Constructor, Describe, Mappable, ModelRef, TypeDescriptor};
use super::types::TypeKey;

/// Vue "liste" d'un objet mappable.
pub trait ListView {
    /// Type déclaré des éléments ; `None` si inconnu
    fn element_type(&self) -> Option<ModelRef>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// L'élément à la position `index` ; `None` pour un trou (ou hors bornes)
    fn item(&self, index: usize) -> Option<&dyn Mappable>;

    /// Ajoute un élément (ou un trou) à la fin ; `false` si le type ne correspond pas
    fn push_item(&mut self, item: Option<Box<dyn Mappable>>) -> bool;
}

impl<T: Describe> ListView for Vec<T> {
    fn element_type(&self) -> Option<ModelRef> {
        Some(ModelRef::of::<T>())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, index: usize) -> Option<&dyn Mappable> {
        self.get(index).map(|item| item as &dyn Mappable)
    }

    fn push_item(&mut self, item: Option<Box<dyn Mappable>>) -> bool {
        match item.map(|item| item.into_any().downcast::<T>()) {
            Some(Ok(item)) => {
                self.push(*item);
                true
            }
            _ => false,
        }
    }
}

impl<T: Describe> Mappable for Vec<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn describe(&self) -> TypeDescriptor {
        <Self as Describe>::descriptor()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_list(&self) -> Option<&dyn ListView> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListView> {
        Some(self)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }
}

impl<T: Describe> ListView for Vec<Option<T>> {
    fn element_type(&self) -> Option<ModelRef> {
        Some(ModelRef::of::<T>())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn item(&self, index: usize) -> Option<&dyn Mappable> {
        self.get(index)
            .and_then(|slot| slot.as_ref())
            .map(|item| item as &dyn Mappable)
    }

    fn push_item(&mut self, item: Option<Box<dyn Mappable>>) -> bool {
        match item {
            None => {
                self.push(None);
                true
            }
            Some(item) => match item.into_any().downcast::<T>() {
                Ok(item) => {
                    self.push(Some(*item));
                    true
                }
                Err(_) => false,
            },
        }
    }
}

impl<T: Describe> Mappable for Vec<Option<T>> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn describe(&self) -> TypeDescriptor {
        <Self as Describe>::descriptor()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_list(&self) -> Option<&dyn ListView> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListView> {
        Some(self)
    }
}

impl<T: Describe> Describe for Vec<Option<T>> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn constructor() -> Option<Constructor> {
        Some(construct_default::<Self>)
    }
}

/// Liste typée-effacée d'objets mappables.
///
/// Le type d'élément est déclaré à la construction ; une liste `untyped`
/// ne peut pas servir à un mapping de listes.
#[derive(Default)]
pub struct DynList {
    element: Option<ModelRef>,
    items: Vec<Option<Box<dyn Mappable>>>,
}

impl DynList {
    pub fn of<T: Describe>() -> Self {
        DynList {
            element: Some(ModelRef::of::<T>()),
            items: Vec::new(),
        }
    }

    pub fn untyped() -> Self {
        DynList::default()
    }

    /// Ajoute un élément ; refusé si la liste est typée et que le type diffère
    pub fn push(&mut self, item: Option<Box<dyn Mappable>>) -> bool {
        if let (Some(element), Some(item)) = (&self.element, &item) {
            if element.key != item.type_key() {
                return false;
            }
        }
        self.items.push(item);
        true
    }

    pub fn get(&self, index: usize) -> Option<&dyn Mappable> {
        self.items.get(index).and_then(|slot| slot.as_deref())
    }

    /// L'élément `index`, converti dans son type concret
    pub fn get_as<T: Mappable>(&self, index: usize) -> Option<&T> {
        self.get(index).and_then(|item| item.as_any().downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ListView for DynList {
    fn element_type(&self) -> Option<ModelRef> {
        self.element
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<&dyn Mappable> {
        self.get(index)
    }

    fn push_item(&mut self, item: Option<Box<dyn Mappable>>) -> bool {
        self.push(item)
    }
}

impl Mappable for DynList {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_list(&self) -> Option<&dyn ListView> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut dyn ListView> {
        Some(self)
    }
}
