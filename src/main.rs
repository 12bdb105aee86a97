// =============================================================================
// COPYCAT — Point d'entrée : démonstration du moteur de mapping
// =============================================================================
//
// Ce main.rs montre un exemple complet :
//   1. Déclarer des modèles (entités et DTO) avec `mappable!`
//   2. Déclarer des profils et construire le mapper depuis une config TOML
//   3. Inspecter les copieurs compilés
//   4. Mapper des objets simples, imbriqués, et des listes
//   5. Observer les erreurs
//
// Journaux : RUST_LOG=copycat=trace cargo run
//
// =============================================================================

use std::sync::Arc;

use copycat::core::model::Describe;
use copycat::{
    mappable, BoxError, DynList, MapperBuilder, MapperConfig, ObjectMapper, ObjectMapperExt,
    Profile, ProfileBuilder, ProfileCatalog, ServiceContainer,
};
use tracing_subscriber::EnvFilter;

// ═══════════════════════════════════════════════════════════
// Les modèles
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
struct Address {
    street: String,
    city: String,
}

mappable!(Address {
    street: value String,
    city: value String,
});

#[derive(Debug, Clone, Default)]
struct AddressDto {
    street: String,
    city: String,
}

mappable!(AddressDto {
    street: value String,
    city: value String,
});

#[derive(Debug, Clone, Default)]
struct Customer {
    id: u64,
    name: String,
    age: Option<i32>,
    address: Option<Address>,
}

mappable!(Customer {
    #[readonly]
    id: value u64,
    name: value String,
    age: nullable i32,
    address: object Address,
});

#[derive(Debug, Clone, Default)]
struct CustomerDto {
    name: String,
    age: i32,
    address: Option<AddressDto>,
    label: String,
}

mappable!(CustomerDto {
    name: value String,
    age: value i32,
    address: object AddressDto,
    label: value String,
});

#[derive(Debug, Clone, Default)]
struct Line {
    sku: String,
    quantity: u32,
}

mappable!(Line {
    sku: value String,
    quantity: value u32,
});

#[derive(Debug, Clone, Default)]
struct LineDto {
    sku: String,
    quantity: Option<u32>,
}

mappable!(LineDto {
    sku: value String,
    quantity: nullable u32,
});

#[derive(Debug, Clone, Default)]
struct Order {
    number: String,
    lines: Vec<Option<Line>>,
}

mappable!(Order {
    number: value String,
    lines: embedded Vec<Option<Line>>,
});

#[derive(Debug, Clone, Default)]
struct OrderDto {
    number: String,
    reference: String,
    lines: Vec<Option<LineDto>>,
}

mappable!(OrderDto {
    number: value String,
    reference: value String,
    lines: embedded Vec<Option<LineDto>>,
});

// ═══════════════════════════════════════════════════════════
// Les profils
// ═══════════════════════════════════════════════════════════

#[derive(Default)]
struct CustomerProfile;

impl Profile for CustomerProfile {
    fn configure(&self, maps: &mut ProfileBuilder) {
        maps.create_map_with_reverse::<Customer, CustomerDto, _, _>(
            |_, customer, dto| {
                dto.label = format!("{} (#{})", customer.name, customer.id);
                Ok(())
            },
            |_, _, _| Ok(()),
        );
    }

    fn name(&self) -> &str {
        "clients"
    }
}

/// Préfixe des références de commande, fourni par les services
struct ReferencePrefix(String);

struct OrderProfile {
    prefix: String,
}

impl Profile for OrderProfile {
    fn configure(&self, maps: &mut ProfileBuilder) {
        let prefix = self.prefix.clone();
        maps.create_map::<Order, OrderDto, _>(move |_, order, dto| {
            dto.reference = format!("{}-{}", prefix, order.number);
            Ok(())
        });
    }

    fn name(&self) -> &str {
        "commandes"
    }
}

const CONFIG: &str = r#"
[mapper]
profiles = ["customers", "orders"]
shared_cache = false
validate_on_build = true
"#;

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    println!("╔══════════════════════════════════════════════════╗");
    println!("║      COPYCAT — Mapping objet-objet               ║");
    println!("║      Copieurs structurels compilés               ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 1 : Les tables des membres
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 1 : Tables des membres ═══\n");

    println!("{}\n", Customer::descriptor());
    println!("{}\n", CustomerDto::descriptor());

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 2 : Profils, configuration, construction du mapper
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 2 : Bootstrap depuis la configuration ═══\n");

    let mut services = ServiceContainer::new();
    services.provide(ReferencePrefix("CMD".into()));
    let services = Arc::new(services);

    let mut catalog = ProfileCatalog::new();
    catalog
        .register::<CustomerProfile>("customers")
        .register_with("orders", |services| {
            let prefix = services.require::<ReferencePrefix>()?;
            Ok(Box::new(OrderProfile {
                prefix: prefix.0.clone(),
            }) as Box<dyn Profile>)
        });

    let config = MapperConfig::from_toml_str(CONFIG)?;
    println!("{}", config.to_toml_string()?);

    let mapper = MapperBuilder::new()
        .with_services(services)
        .from_config(&config, &catalog)?
        .build()?;

    println!("{}\n", mapper.registry());
    println!("✓ Mapper construit et validé ({} copieurs en cache)\n", mapper.cache().len());

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 3 : Les copieurs compilés
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 3 : Copieurs compilés ═══\n");

    println!("{}\n", mapper.plan(&Customer::descriptor(), &CustomerDto::descriptor())?);
    println!("{}\n", mapper.plan(&CustomerDto::descriptor(), &Customer::descriptor())?);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 4 : Objets simples
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 4 : Mapping simple ═══\n");

    let alice = Customer {
        id: 1,
        name: "Alice".into(),
        age: Some(30),
        address: None,
    };
    let dto: CustomerDto = mapper.map(&alice)?;
    println!("{:?}\n  → {:?}\n", alice, dto);

    let bob = Customer {
        id: 2,
        name: "Bob".into(),
        ..Customer::default()
    };
    let mut previous = CustomerDto {
        age: 99,
        ..CustomerDto::default()
    };
    mapper.map_into(&bob, &mut previous)?;
    println!("{:?}\n  → {:?} (âge absent : valeur précédente conservée)\n", bob, previous);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 5 : Objets imbriqués
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 5 : Objets imbriqués ═══\n");

    let incoming = CustomerDto {
        name: "Alice".into(),
        age: 31,
        address: Some(AddressDto {
            street: "1 rue Nationale".into(),
            city: "Lille".into(),
        }),
        label: String::new(),
    };
    let mut stored = Customer {
        id: 1,
        name: "Alice".into(),
        age: Some(30),
        address: Some(Address {
            street: "ancienne rue".into(),
            city: "Roubaix".into(),
        }),
    };
    mapper.map_into(&incoming, &mut stored)?;
    println!("fusion en place : {:?}\n", stored);

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 6 : Listes
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 6 : Listes ═══\n");

    let order = Order {
        number: "2024-001".into(),
        lines: vec![
            Some(Line {
                sku: "CLAVIER".into(),
                quantity: 2,
            }),
            None,
            Some(Line {
                sku: "SOURIS".into(),
                quantity: 1,
            }),
        ],
    };
    let order_dto: OrderDto = mapper.map(&order)?;
    println!("{} → {}", order.number, order_dto.reference);
    for (index, line) in order_dto.lines.iter().enumerate() {
        match line {
            Some(line) => println!("  [{}] {} x {:?}", index, line.sku, line.quantity),
            None => println!("  [{}] (vide)", index),
        }
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 7 : Erreurs
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 7 : Erreurs ═══\n");

    let untyped = DynList::untyped();
    let mut lines = DynList::of::<LineDto>();
    match mapper.map_into(&untyped, &mut lines) {
        Ok(()) => println!("✗ une liste sans type d'élément a été acceptée"),
        Err(e) => println!("✓ {}", e),
    }

    let unknown = MapperBuilder::new().add_profiles(&catalog, &["inventaire".to_string()]);
    if let Err(e) = unknown {
        println!("✓ {}", e);
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("Mapping terminé !");
    println!("  {} relations enregistrées", mapper.registry().len());
    println!("  {} copieurs compilés", mapper.cache().len());
    println!("═══════════════════════════════════════════════════");

    Ok(())
}
