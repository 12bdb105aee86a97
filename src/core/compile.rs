// =============================================================================
// COMPILE — Le compilateur de copieurs structurels
// =============================================================================
//
// Pour une paire (S, T), on construit UNE FOIS une fonction de copie
// `copy(source, target, mapper)` faite d'étapes, une par paire de membres
// éligibles de même nom. Chaque étape est une fermeture construite à partir
// des métadonnées des membres : à l'exécution, plus aucune introspection.
//
// STRATÉGIE par paire de membres, dans cet ordre de priorité :
//
//   1. même type déclaré             → copie directe       t.M = s.M
//   2. t.M est "nullable de" type(s.M) → wrap               t.M = Some(s.M)
//   3. s.M est "nullable de" type(t.M) → unwrap si présent  sinon t.M intact
//   4. deux types complexes différents → mapping imbriqué
//   5. sinon                          → ignoré, sans erreur
//
// MAPPING IMBRIQUÉ (règle 4), avec s = source.M et t0 = target.M :
//
//   s absent           → t.M n'est pas touché
//   s présent, t0 absent → instance neuve de type(t.M), mappée depuis s, assignée
//   s présent, t0 présent → fusion en place : map(s, t0), t.M n'est pas réassigné
//
// C'est une sémantique de MISE À JOUR PARTIELLE : "absent" veut dire
// "ne touche à rien", jamais "efface".
//
// =============================================================================

use std::any::Any;
use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use super::error::{MapError, MapResult};
use super::introspect::{pair_members, MemberPair};
use super::mapper::ObjectMapper;
use super::model::{Mappable, Member, ReadFn, Shape, TypeDescriptor, WriteFn};
use super::types::{TypeKey, TypePair};

/// Stratégie retenue pour une paire de membres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Wrap,
    Unwrap,
    Nested,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => write!(f, "copie directe"),
            Strategy::Wrap => write!(f, "wrap"),
            Strategy::Unwrap => write!(f, "unwrap si présent"),
            Strategy::Nested => write!(f, "mapping imbriqué"),
        }
    }
}

/// Erreur pendant l'exécution d'un copieur compilé
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("l'objet {found} n'est pas un {expected}")]
    WrongOwner { expected: TypeKey, found: TypeKey },

    #[error("valeur de type inattendu pour le membre `{member}`")]
    Mismatch { member: &'static str },

    #[error("échec du mapping imbriqué du membre `{member}`")]
    Nested {
        member: &'static str,
        #[source]
        source: MapError,
    },
}

type StepFn =
    Box<dyn Fn(&dyn Any, &mut dyn Any, &dyn ObjectMapper) -> Result<(), CopyError> + Send + Sync>;

/// Une étape du copieur : la copie d'un membre
pub struct CopyStep {
    pub member: &'static str,
    pub strategy: Strategy,
    run: StepFn,
}

/// Une paire de membres de même nom sans règle de pont (règle 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedMember {
    pub member: &'static str,
    pub source_ty: TypeKey,
    pub target_ty: TypeKey,
}

/// Le copieur structurel d'une paire de types. Immuable une fois construit.
pub struct CompiledCopy {
    pair: TypePair,
    steps: Vec<CopyStep>,
    skipped: Vec<SkippedMember>,
}

impl CompiledCopy {
    pub fn pair(&self) -> TypePair {
        self.pair
    }

    pub fn steps(&self) -> &[CopyStep] {
        &self.steps
    }

    pub fn skipped(&self) -> &[SkippedMember] {
        &self.skipped
    }

    /// La stratégie retenue pour un membre, s'il est copié
    pub fn strategy_of(&self, member: &str) -> Option<Strategy> {
        self.steps
            .iter()
            .find(|s| s.member == member)
            .map(|s| s.strategy)
    }

    /// Exécute les étapes dans l'ordre. La cible est modifiée en place ;
    /// en cas d'erreur, les membres déjà copiés le restent.
    pub fn run(
        &self,
        source: &dyn Mappable,
        target: &mut dyn Mappable,
        mapper: &dyn ObjectMapper,
    ) -> Result<(), CopyError> {
        if source.type_key() != self.pair.source {
            return Err(CopyError::WrongOwner {
                expected: self.pair.source,
                found: source.type_key(),
            });
        }
        if target.type_key() != self.pair.target {
            return Err(CopyError::WrongOwner {
                expected: self.pair.target,
                found: target.type_key(),
            });
        }

        let src = source.as_any();
        let dst = target.as_any_mut();
        for step in &self.steps {
            (step.run)(src, &mut *dst, mapper)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CompiledCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCopy")
            .field("pair", &self.pair)
            .field(
                "steps",
                &self
                    .steps
                    .iter()
                    .map(|s| (s.member, s.strategy))
                    .collect::<Vec<_>>(),
            )
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl fmt::Display for CompiledCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "copier {} = {{", self.pair)?;
        for step in &self.steps {
            writeln!(f, "  {} : {}", step.member, step.strategy)?;
        }
        for skip in &self.skipped {
            writeln!(
                f,
                "  {} : ignoré ({} ≠ {})",
                skip.member, skip.source_ty, skip.target_ty
            )?;
        }
        write!(f, "}}")
    }
}

/// Choisit la stratégie d'une paire de membres ; `None` = règle 5
pub fn select_strategy(source: &Member, target: &Member) -> Option<Strategy> {
    if source.ty == target.ty {
        return Some(Strategy::Direct);
    }
    if target.shape.nullable_inner() == Some(source.ty) {
        return Some(Strategy::Wrap);
    }
    if source.shape.nullable_inner() == Some(target.ty) {
        return Some(Strategy::Unwrap);
    }
    if source.shape.is_object() && target.shape.is_object() {
        return Some(Strategy::Nested);
    }
    None
}

/// Compile le copieur structurel de la paire (source, target).
///
/// Échoue si une paire relevant des règles 2 ou 3 n'a pas les primitives
/// nullable nécessaires. Les paires sans règle sont ignorées.
pub fn compile(source: &TypeDescriptor, target: &TypeDescriptor) -> MapResult<CompiledCopy> {
    let pair = TypePair::new(source.key, target.key);
    let mut steps = Vec::new();
    let mut skipped = Vec::new();

    for members in pair_members(source, target) {
        let Some(strategy) = select_strategy(members.source, members.target) else {
            trace!(
                pair = %pair,
                member = members.source.name,
                "membre ignoré : aucune règle de pont"
            );
            skipped.push(SkippedMember {
                member: members.source.name,
                source_ty: members.source.ty,
                target_ty: members.target.ty,
            });
            continue;
        };

        let run = match strategy {
            Strategy::Direct => direct_step(pair, members)?,
            Strategy::Wrap => wrap_step(pair, members)?,
            Strategy::Unwrap => unwrap_step(pair, members)?,
            Strategy::Nested => nested_step(pair, members)?,
        };
        steps.push(CopyStep {
            member: members.source.name,
            strategy,
            run,
        });
    }

    debug!(
        pair = %pair,
        steps = steps.len(),
        skipped = skipped.len(),
        "copieur structurel compilé"
    );
    Ok(CompiledCopy {
        pair,
        steps,
        skipped,
    })
}

fn compilation_error(pair: TypePair, member: &Member, reason: &str) -> MapError {
    MapError::Compilation {
        pair,
        member: member.name.to_string(),
        reason: reason.to_string(),
    }
}

fn accessors(
    pair: TypePair,
    members: MemberPair<'_>,
) -> MapResult<(ReadFn, WriteFn)> {
    let read = members
        .source
        .reader()
        .cloned()
        .ok_or_else(|| compilation_error(pair, members.source, "membre source illisible"))?;
    let write = members
        .target
        .writer()
        .cloned()
        .ok_or_else(|| compilation_error(pair, members.target, "membre cible non inscriptible"))?;
    Ok((read, write))
}

// 1. t.M = s.M
fn direct_step(pair: TypePair, members: MemberPair<'_>) -> MapResult<StepFn> {
    let (read, write) = accessors(pair, members)?;
    let member = members.source.name;
    Ok(Box::new(
        move |src: &dyn Any, dst: &mut dyn Any, _mapper: &dyn ObjectMapper| {
            let value = read(src).ok_or(CopyError::Mismatch { member })?;
            if write(dst, value) {
                Ok(())
            } else {
                Err(CopyError::Mismatch { member })
            }
        },
    ))
}

// 2. t.M = wrap(s.M), toujours exécuté
fn wrap_step(pair: TypePair, members: MemberPair<'_>) -> MapResult<StepFn> {
    let Shape::Nullable { ops: Some(ops), .. } = &members.target.shape else {
        return Err(compilation_error(pair, members.target, "primitive wrap introuvable"));
    };
    let wrap = ops.wrap;
    let (read, write) = accessors(pair, members)?;
    let member = members.source.name;
    Ok(Box::new(
        move |src: &dyn Any, dst: &mut dyn Any, _mapper: &dyn ObjectMapper| {
            let value = read(src).ok_or(CopyError::Mismatch { member })?;
            let wrapped = wrap(value).ok_or(CopyError::Mismatch { member })?;
            if write(dst, wrapped) {
                Ok(())
            } else {
                Err(CopyError::Mismatch { member })
            }
        },
    ))
}

// 3. si s.M est présent : t.M = unwrap(s.M) ; sinon t.M intact
fn unwrap_step(pair: TypePair, members: MemberPair<'_>) -> MapResult<StepFn> {
    let Shape::Nullable { ops: Some(ops), .. } = &members.source.shape else {
        return Err(compilation_error(
            pair,
            members.source,
            "primitives présence/unwrap introuvables",
        ));
    };
    let (is_present, unwrap) = (ops.is_present, ops.unwrap);
    let (read, write) = accessors(pair, members)?;
    let member = members.source.name;
    Ok(Box::new(
        move |src: &dyn Any, dst: &mut dyn Any, _mapper: &dyn ObjectMapper| {
            let value = read(src).ok_or(CopyError::Mismatch { member })?;
            if !is_present(&*value).ok_or(CopyError::Mismatch { member })? {
                return Ok(());
            }
            let inner = unwrap(value).ok_or(CopyError::Mismatch { member })?;
            if write(dst, inner) {
                Ok(())
            } else {
                Err(CopyError::Mismatch { member })
            }
        },
    ))
}

// 4. mapping imbriqué avec garde sur l'absence
fn nested_step(pair: TypePair, members: MemberPair<'_>) -> MapResult<StepFn> {
    let Shape::Object { ops: src_ops, .. } = &members.source.shape else {
        return Err(compilation_error(pair, members.source, "membre source non complexe"));
    };
    let Shape::Object {
        model,
        ops: dst_ops,
    } = &members.target.shape
    else {
        return Err(compilation_error(pair, members.target, "membre cible non complexe"));
    };
    if !members.target.is_writable() {
        return Err(compilation_error(pair, members.target, "membre cible non inscriptible"));
    }

    let borrow = src_ops.borrow.clone();
    let borrow_mut = dst_ops.borrow_mut.clone();
    let assign = dst_ops.assign.clone();
    let model = *model;
    let member = members.source.name;
    Ok(Box::new(
        move |src: &dyn Any, dst: &mut dyn Any, mapper: &dyn ObjectMapper| {
            let nested = |source: MapError| CopyError::Nested { member, source };

            let Some(s) = borrow(src) else {
                return Ok(());
            };
            if let Some(t0) = borrow_mut(&mut *dst) {
                return mapper.map_into(s, t0).map_err(nested);
            }

            let mut fresh = mapper.instantiate(model).map_err(nested)?;
            mapper.map_into(s, &mut *fresh).map_err(nested)?;
            if assign(dst, fresh) {
                Ok(())
            } else {
                Err(CopyError::Mismatch { member })
            }
        },
    ))
}
