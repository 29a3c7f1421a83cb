// =============================================================================
// CATEGORY — La catégorie finie qui décrit la structure des données
// =============================================================================
//
// Une catégorie finie, c'est :
//   - des OBJETS (les "tables" du schéma)
//   - des MORPHISMES f : A → B (les "flèches" entre tables)
//   - une IDENTITÉ id_A : A → A par objet
//   - une COMPOSITION : si f : A → B et g : B → C, alors g∘f : A → C
//
// Ici la composition est une TABLE EXPLICITE fournie par l'auteur du
// schéma. Les seuls composés dérivés sont ceux qui font intervenir une
// identité (id;g = g et f;id = f). Tout le reste doit être déclaré.
//
// CONVENTION : `compose(f, g)` applique f D'ABORD, puis g.
//   compose(f, g) = g ∘ f : f.source → g.target
//
// EXEMPLE :
//
//   Employee ──works_in──▶ Department ──managed_by──▶ Manager
//       └──────────────── boss ──────────────────────────┘
//
//   compose(works_in, managed_by) = boss
//
// À la construction, on refuse tout de suite (fail fast) les tables
// incohérentes : extrémités fausses, loi d'identité contredite, et
// associativité violée sur les triplets présents dans la table.
//
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CompositionFailure, Error, Result};

/// Un objet de la catégorie. Opaque : seul son nom compte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
}

impl Object {
    pub fn new(name: &str) -> Self {
        Object { name: name.to_string() }
    }
}

impl From<&str> for Object {
    fn from(name: &str) -> Self {
        Object::new(name)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Nature d'un morphisme. L'identité est un cas à part entière,
/// jamais déduite du nom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MorphismKind {
    Identity,
    Generator,
}

/// Un morphisme nommé `name : source → target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Morphism {
    pub name: String,
    pub source: Object,
    pub target: Object,
    pub kind: MorphismKind,
}

impl Morphism {
    /// Morphisme déclaré par l'auteur du schéma.
    pub fn generator(name: &str, source: &Object, target: &Object) -> Self {
        Morphism {
            name: name.to_string(),
            source: source.clone(),
            target: target.clone(),
            kind: MorphismKind::Generator,
        }
    }

    /// L'identité de `obj`. Le nom `id_<obj>` ne sert qu'à l'affichage
    /// et aux recherches par nom.
    pub fn identity(obj: &Object) -> Self {
        Morphism {
            name: identity_name(obj),
            source: obj.clone(),
            target: obj.clone(),
            kind: MorphismKind::Identity,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.kind == MorphismKind::Identity
    }
}

impl fmt::Display for Morphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} -> {}", self.name, self.source, self.target)
    }
}

fn identity_name(obj: &Object) -> String {
    format!("id_{}", obj.name)
}

/// Une catégorie finie, immuable une fois construite.
///
/// Se construit via [`Category::builder`] : c'est `build()` qui vérifie
/// la cohérence de la table de composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    objects: BTreeSet<Object>,
    /// Tous les morphismes, identités comprises : nom → morphisme
    morphisms: BTreeMap<String, Morphism>,
    /// (f, g) → nom de g∘f, hors cas d'identité
    composites: BTreeMap<(String, String), String>,
}

impl Category {
    /// Commence la description d'une catégorie.
    pub fn builder(name: &str) -> CategoryBuilder {
        CategoryBuilder::new(name)
    }

    /// Catégorie discrète : des objets, leurs identités, rien d'autre.
    pub fn discrete<'a, I>(name: &str, objects: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let objects: BTreeSet<Object> = objects.into_iter().map(Object::new).collect();
        let morphisms = objects
            .iter()
            .map(|o| (identity_name(o), Morphism::identity(o)))
            .collect();
        Category {
            name: name.to_string(),
            objects,
            morphisms,
            composites: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    pub fn contains_object(&self, obj: &Object) -> bool {
        self.objects.contains(obj)
    }

    /// Recherche un morphisme (identités comprises) par nom.
    pub fn morphism(&self, name: &str) -> Option<&Morphism> {
        self.morphisms.get(name)
    }

    /// Tous les morphismes, identités comprises.
    pub fn morphisms(&self) -> impl Iterator<Item = &Morphism> {
        self.morphisms.values()
    }

    /// Les morphismes qui ne sont pas des identités.
    pub fn generators(&self) -> impl Iterator<Item = &Morphism> {
        self.morphisms.values().filter(|m| !m.is_identity())
    }

    /// Hom(a, b) : les morphismes de `a` vers `b`.
    pub fn hom(&self, a: &Object, b: &Object) -> Vec<&Morphism> {
        self.morphisms
            .values()
            .filter(|m| &m.source == a && &m.target == b)
            .collect()
    }

    /// Toutes les paires (f, g) avec `f.target == g.source`.
    pub fn composable_pairs(&self) -> Vec<(&Morphism, &Morphism)> {
        let mut pairs = Vec::new();
        for f in self.morphisms.values() {
            for g in self.morphisms.values().filter(|g| g.source == f.target) {
                pairs.push((f, g));
            }
        }
        pairs
    }

    /// L'identité de `obj`.
    pub fn identity(&self, obj: &Object) -> Result<Morphism> {
        if !self.objects.contains(obj) {
            return Err(Error::UnknownObject {
                object: obj.clone(),
                category: self.name.clone(),
            });
        }
        Ok(Morphism::identity(obj))
    }

    /// Compose `f` puis `g` : le résultat va de `f.source` à `g.target`.
    ///
    /// Les composés avec une identité sont dérivés. Les autres doivent
    /// figurer dans la table, sinon `Composition { NoComposite }`.
    pub fn compose(&self, f: &Morphism, g: &Morphism) -> Result<Morphism> {
        self.check_member(f)?;
        self.check_member(g)?;
        self.compose_names(&f.name, &g.name).cloned()
    }

    fn check_member(&self, m: &Morphism) -> Result<()> {
        match self.morphisms.get(&m.name) {
            Some(known) if known == m => Ok(()),
            _ => Err(Error::UnknownMorphism {
                morphism: m.name.clone(),
                category: self.name.clone(),
            }),
        }
    }

    fn compose_names(&self, f: &str, g: &str) -> Result<&Morphism> {
        let mf = self.lookup(f)?;
        let mg = self.lookup(g)?;
        if mf.target != mg.source {
            return Err(composition_error(f, g, CompositionFailure::NotComposable));
        }
        if mf.is_identity() {
            return Ok(mg);
        }
        if mg.is_identity() {
            return Ok(mf);
        }
        match self.composites.get(&(f.to_string(), g.to_string())) {
            Some(h) => self.lookup(h),
            None => Err(composition_error(f, g, CompositionFailure::NoComposite)),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Morphism> {
        self.morphisms.get(name).ok_or_else(|| Error::UnknownMorphism {
            morphism: name.to_string(),
            category: self.name.clone(),
        })
    }

    /// Vérifie l'associativité sur les triplets (f, g, k) de la table où
    /// `(f;g);k` et `f;(g;k)` sont tous deux définis.
    fn check_associativity(&self) -> Result<()> {
        for ((f, g), fg) in &self.composites {
            for ((g2, k), gk) in &self.composites {
                if g2 != g {
                    continue;
                }
                let (Ok(lhs), Ok(rhs)) = (self.compose_names(fg, k), self.compose_names(f, gk)) else {
                    continue;
                };
                if lhs.name != rhs.name {
                    return Err(composition_error(f, k, CompositionFailure::NonAssociative));
                }
            }
        }
        Ok(())
    }
}

fn composition_error(f: &str, g: &str, reason: CompositionFailure) -> Error {
    Error::Composition {
        left: f.to_string(),
        right: g.to_string(),
        reason,
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "category {} = literal {{", self.name)?;

        writeln!(f, "  objects")?;
        for obj in &self.objects {
            writeln!(f, "    {}", obj)?;
        }

        let generators: Vec<_> = self.generators().collect();
        if !generators.is_empty() {
            writeln!(f, "  morphisms")?;
            for m in generators {
                writeln!(f, "    {}", m)?;
            }
        }

        if !self.composites.is_empty() {
            writeln!(f, "  compositions")?;
            for ((g1, g2), h) in &self.composites {
                writeln!(f, "    {} ; {} = {}", g1, g2, h)?;
            }
        }

        write!(f, "}}")
    }
}

/// Description en cours d'une catégorie.
///
/// Les méthodes s'enchaînent comme pour un schéma : rien n'est vérifié
/// avant `build()`.
#[derive(Debug, Clone)]
pub struct CategoryBuilder {
    name: String,
    objects: BTreeSet<Object>,
    generators: Vec<(String, Object, Object)>,
    composites: Vec<(String, String, String)>,
}

impl CategoryBuilder {
    fn new(name: &str) -> Self {
        CategoryBuilder {
            name: name.to_string(),
            objects: BTreeSet::new(),
            generators: Vec::new(),
            composites: Vec::new(),
        }
    }

    /// Ajoute un objet.
    pub fn object(&mut self, name: &str) -> &mut Self {
        self.objects.insert(Object::new(name));
        self
    }

    /// Ajoute un morphisme `name : source → target`.
    pub fn morphism(&mut self, name: &str, source: &str, target: &str) -> &mut Self {
        self.generators
            .push((name.to_string(), Object::new(source), Object::new(target)));
        self
    }

    /// Déclare `compose(f, g) = h`, c'est-à-dire `g ∘ f = h`.
    pub fn composite(&mut self, f: &str, g: &str, h: &str) -> &mut Self {
        self.composites
            .push((f.to_string(), g.to_string(), h.to_string()));
        self
    }

    /// Construit la catégorie et valide toute la table.
    pub fn build(&self) -> Result<Category> {
        let mut category = Category {
            name: self.name.clone(),
            objects: self.objects.clone(),
            morphisms: self
                .objects
                .iter()
                .map(|o| (identity_name(o), Morphism::identity(o)))
                .collect(),
            composites: BTreeMap::new(),
        };

        for (name, source, target) in &self.generators {
            for endpoint in [source, target] {
                if !category.objects.contains(endpoint) {
                    return Err(Error::UnknownObject {
                        object: endpoint.clone(),
                        category: self.name.clone(),
                    });
                }
            }
            if category.morphisms.contains_key(name) {
                return Err(Error::DuplicateMorphism {
                    morphism: name.clone(),
                    category: self.name.clone(),
                });
            }
            category
                .morphisms
                .insert(name.clone(), Morphism::generator(name, source, target));
        }

        for (f, g, h) in &self.composites {
            let mf = category.lookup(f)?;
            let mg = category.lookup(g)?;
            let mh = category.lookup(h)?;
            if mf.target != mg.source {
                return Err(composition_error(f, g, CompositionFailure::NotComposable));
            }
            if mh.source != mf.source || mh.target != mg.target {
                return Err(composition_error(f, g, CompositionFailure::BadComposite));
            }
            if mf.is_identity() || mg.is_identity() {
                // id;g = g et f;id = f : rien à stocker, mais pas de contradiction
                let expected = if mf.is_identity() { g } else { f };
                if h != expected {
                    return Err(composition_error(f, g, CompositionFailure::IdentityLaw));
                }
                continue;
            }
            let key = (f.clone(), g.clone());
            if category.composites.get(&key).is_some_and(|existing| existing != h) {
                return Err(composition_error(f, g, CompositionFailure::BadComposite));
            }
            category.composites.insert(key, h.clone());
        }

        category.check_associativity()?;
        Ok(category)
    }
}
