//! Database seeder for FerreDesk development and testing.
//!
//! Seeds the ferreteria configuration row, a demo supplier with a few
//! products and costs, and two demo customers. The catalog tables
//! (alícuotas, comprobantes, listas, métodos de pago) are seeded by the
//! migrations; this only adds the movable demo data on top.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use ferredesk_db::entities::{
    alicuotas_iva, clientes, comprobantes, ferreterias, proveedores, stock, stock_prove,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ferredesk_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding ferreteria...");
    seed_ferreteria(&db).await;

    println!("Seeding proveedor...");
    let proveedor_id = seed_proveedor(&db).await;

    println!("Seeding clientes...");
    seed_clientes(&db).await;

    println!("Seeding stock...");
    seed_stock(&db, proveedor_id).await;

    println!("Seeding complete!");
}

/// Id of a catalog row looked up by a unique column.
async fn alicuota_21(db: &DatabaseConnection) -> i32 {
    alicuotas_iva::Entity::find()
        .filter(alicuotas_iva::Column::Codigo.eq("5"))
        .one(db)
        .await
        .expect("Failed to query alicuotas")
        .expect("Migrations must run before seeding")
        .id
}

async fn seed_ferreteria(db: &DatabaseConnection) {
    if ferreterias::Entity::find()
        .one(db)
        .await
        .expect("Failed to query ferreterias")
        .is_some()
    {
        println!("  Ferreteria already configured, skipping...");
        return;
    }

    let alicuota = alicuota_21(db).await;
    let factura_interna = comprobantes::Entity::find()
        .filter(comprobantes::Column::CodigoAfip.eq("9997"))
        .one(db)
        .await
        .expect("Failed to query comprobantes")
        .expect("Migrations must run before seeding");

    let ahora = Utc::now();
    ferreterias::ActiveModel {
        cuit: Set("30-71234567-8".to_string()),
        razon_social: Set("Ferretería Demo S.R.L.".to_string()),
        situacion_iva: Set("Responsable Inscripto".to_string()),
        punto_venta_defecto: Set(1),
        arca_habilitado: Set(false),
        modo_arca: Set("HOM".to_string()),
        certificado_path: Set(None),
        clave_privada_path: Set(None),
        alicuota_iva_defecto_id: Set(alicuota),
        comprobante_defecto_id: Set(factura_interna.id),
        ultima_validacion: Set(None),
        created_at: Set(ahora.into()),
        updated_at: Set(ahora.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed ferreteria");
}

async fn seed_proveedor(db: &DatabaseConnection) -> i32 {
    if let Some(existente) = proveedores::Entity::find()
        .filter(proveedores::Column::Razon.eq("Distribuidora Acuario"))
        .one(db)
        .await
        .expect("Failed to query proveedores")
    {
        println!("  Proveedor already exists, skipping...");
        return existente.id;
    }

    proveedores::ActiveModel {
        razon: Set("Distribuidora Acuario".to_string()),
        fantasia: Set(Some("Acuario".to_string())),
        domicilio: Set(Some("Av. Rivadavia 1234".to_string())),
        cuit: Set(Some("30-65432109-7".to_string())),
        sigla: Set(Some("ACU".to_string())),
        activo: Set("A".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed proveedor")
    .id
}

async fn seed_clientes(db: &DatabaseConnection) {
    let demo = [
        // (razon, cuit, dni, tipo_iva, lista)
        (
            "Constructora del Sur S.A.",
            Some("30-61234567-4"),
            None,
            Some(1),
            1_i16,
        ),
        ("Juan Pérez", None, Some("28123456"), Some(5), 0),
    ];

    for (razon, cuit, dni, tipo_iva, lista) in demo {
        let existe = clientes::Entity::find()
            .filter(clientes::Column::Razon.eq(razon))
            .one(db)
            .await
            .expect("Failed to query clientes")
            .is_some();
        if existe {
            println!("  Cliente '{razon}' already exists, skipping...");
            continue;
        }
        clientes::ActiveModel {
            razon: Set(razon.to_string()),
            cuit: Set(cuit.map(String::from)),
            dni: Set(dni.map(String::from)),
            tipo_iva_id: Set(tipo_iva),
            lista_precio: Set(lista),
            descu1: Set(Decimal::ZERO),
            descu2: Set(Decimal::ZERO),
            descu3: Set(Decimal::ZERO),
            activo: Set("A".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed cliente");
    }
}

async fn seed_stock(db: &DatabaseConnection, proveedor_id: i32) {
    let alicuota = alicuota_21(db).await;
    let productos = [
        // (codvta, deno, margen, costo, cantidad)
        ("TOR-8x50", "Tornillo fix 8x50 x100", "35", "1500.00", "40"),
        ("PIN-LAT-20", "Pintura látex interior 20L", "28", "38000.00", "12"),
        ("DIS-115", "Disco corte amoladora 115mm", "40", "900.00", "150"),
    ];

    for (codvta, deno, margen, costo, cantidad) in productos {
        let existe = stock::Entity::find()
            .filter(stock::Column::Codvta.eq(codvta))
            .one(db)
            .await
            .expect("Failed to query stock")
            .is_some();
        if existe {
            println!("  Producto '{codvta}' already exists, skipping...");
            continue;
        }

        let producto = stock::ActiveModel {
            codvta: Set(codvta.to_string()),
            deno: Set(deno.to_string()),
            unidad: Set("unidad".to_string()),
            margen: Set(margen.parse().expect("margen literal")),
            idaliiva: Set(alicuota),
            proveedor_habitual_id: Set(proveedor_id),
            acti: Set("A".to_string()),
            precio_lista_0: Set(None),
            precio_lista_0_manual: Set(false),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed stock");

        stock_prove::ActiveModel {
            stock_id: Set(producto.id),
            proveedor_id: Set(proveedor_id),
            costo: Set(costo.parse().expect("costo literal")),
            cantidad: Set(cantidad.parse().expect("cantidad literal")),
            codigo_producto_proveedor: Set(None),
            fecha_ultima_compra: Set(Some(Utc::now().date_naive())),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed stock_prove");
    }
}
