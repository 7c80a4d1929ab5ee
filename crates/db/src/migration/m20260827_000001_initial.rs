//! Initial database migration.
//!
//! Creates every table of the sales, purchases, stock, ledger and caja
//! domains, plus the catalog seed rows the engine assumes (the five price
//! lists and the standard IVA rates).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CATALOGS
        // ============================================================
        db.execute_unprepared(ALICUOTAS_IVA_SQL).await?;
        db.execute_unprepared(COMPROBANTES_SQL).await?;
        db.execute_unprepared(FERRETERIAS_SQL).await?;

        // ============================================================
        // PART 2: PARTIES AND PRODUCTS
        // ============================================================
        db.execute_unprepared(CLIENTES_SQL).await?;
        db.execute_unprepared(PROVEEDORES_SQL).await?;
        db.execute_unprepared(STOCK_SQL).await?;
        db.execute_unprepared(STOCK_PROVE_SQL).await?;

        // ============================================================
        // PART 3: PRICE LISTS
        // ============================================================
        db.execute_unprepared(LISTAS_PRECIO_SQL).await?;
        db.execute_unprepared(PRECIOS_PRODUCTO_LISTA_SQL).await?;
        db.execute_unprepared(ACTUALIZACIONES_LISTA_SQL).await?;

        // ============================================================
        // PART 4: SALES
        // ============================================================
        db.execute_unprepared(VENTAS_SQL).await?;
        db.execute_unprepared(VENTA_DETALLE_ITEMS_SQL).await?;
        db.execute_unprepared(VENTA_CONTADORES_SQL).await?;
        db.execute_unprepared(COMPROBANTE_ASOCIACIONES_SQL).await?;

        // ============================================================
        // PART 5: CUENTA CORRIENTE
        // ============================================================
        db.execute_unprepared(RECIBOS_SQL).await?;
        db.execute_unprepared(ORDENES_PAGO_SQL).await?;
        db.execute_unprepared(AJUSTES_PROVEEDOR_SQL).await?;
        db.execute_unprepared(IMPUTACIONES_SQL).await?;

        // ============================================================
        // PART 6: PURCHASES
        // ============================================================
        db.execute_unprepared(COMPRAS_SQL).await?;
        db.execute_unprepared(COMPRA_DETALLE_ITEMS_SQL).await?;
        db.execute_unprepared(ORDENES_COMPRA_SQL).await?;
        db.execute_unprepared(ORDEN_COMPRA_ITEMS_SQL).await?;

        // ============================================================
        // PART 7: RESERVATIONS AND LOCKS
        // ============================================================
        db.execute_unprepared(RESERVAS_STOCK_SQL).await?;
        db.execute_unprepared(FORM_LOCKS_SQL).await?;

        // ============================================================
        // PART 8: CAJA
        // ============================================================
        db.execute_unprepared(SESIONES_CAJA_SQL).await?;
        db.execute_unprepared(METODOS_PAGO_SQL).await?;
        db.execute_unprepared(MOVIMIENTOS_CAJA_SQL).await?;
        db.execute_unprepared(PAGOS_VENTA_SQL).await?;
        db.execute_unprepared(CHEQUES_SQL).await?;

        // ============================================================
        // PART 9: SEED ROWS
        // ============================================================
        db.execute_unprepared(SEED_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ALICUOTAS_IVA_SQL: &str = r"
CREATE TABLE alicuotas_iva (
    id SERIAL PRIMARY KEY,
    codigo VARCHAR(3) NOT NULL UNIQUE,
    deno VARCHAR(50) NOT NULL,
    porce NUMERIC(5,2) NOT NULL
);
";

const COMPROBANTES_SQL: &str = r"
CREATE TABLE comprobantes (
    id SERIAL PRIMARY KEY,
    codigo_afip VARCHAR(4) NOT NULL UNIQUE,
    nombre VARCHAR(60) NOT NULL,
    letra VARCHAR(1) NOT NULL CHECK (letra IN ('A','B','C','E','I','P','O')),
    tipo VARCHAR(30) NOT NULL,
    activo BOOLEAN NOT NULL DEFAULT TRUE
);
";

const FERRETERIAS_SQL: &str = r"
CREATE TABLE ferreterias (
    id SERIAL PRIMARY KEY,
    cuit VARCHAR(13) NOT NULL,
    razon_social VARCHAR(100) NOT NULL,
    situacion_iva VARCHAR(30) NOT NULL,
    punto_venta_defecto INTEGER NOT NULL DEFAULT 1,
    arca_habilitado BOOLEAN NOT NULL DEFAULT FALSE,
    modo_arca VARCHAR(4) NOT NULL DEFAULT 'HOM' CHECK (modo_arca IN ('HOM','PROD')),
    certificado_path VARCHAR(255),
    clave_privada_path VARCHAR(255),
    alicuota_iva_defecto_id INTEGER NOT NULL REFERENCES alicuotas_iva(id),
    comprobante_defecto_id INTEGER NOT NULL REFERENCES comprobantes(id),
    ultima_validacion TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CLIENTES_SQL: &str = r"
CREATE TABLE clientes (
    id SERIAL PRIMARY KEY,
    razon VARCHAR(100) NOT NULL,
    fantasia VARCHAR(100),
    domicilio VARCHAR(150),
    localidad VARCHAR(80),
    cuit VARCHAR(13) UNIQUE,
    dni VARCHAR(10),
    tipo_iva_id INTEGER,
    lista_precio SMALLINT NOT NULL DEFAULT 0 CHECK (lista_precio BETWEEN 0 AND 4),
    descu1 NUMERIC(5,2) NOT NULL DEFAULT 0,
    descu2 NUMERIC(5,2) NOT NULL DEFAULT 0,
    descu3 NUMERIC(5,2) NOT NULL DEFAULT 0,
    vendedor VARCHAR(60),
    plazo VARCHAR(30),
    activo VARCHAR(1) NOT NULL DEFAULT 'A' CHECK (activo IN ('A','I'))
);
";

const PROVEEDORES_SQL: &str = r"
CREATE TABLE proveedores (
    id SERIAL PRIMARY KEY,
    razon VARCHAR(100) NOT NULL,
    fantasia VARCHAR(100),
    domicilio VARCHAR(150),
    cuit VARCHAR(13),
    sigla VARCHAR(10),
    activo VARCHAR(1) NOT NULL DEFAULT 'A' CHECK (activo IN ('A','I'))
);
";

const STOCK_SQL: &str = r"
CREATE TABLE stock (
    id SERIAL PRIMARY KEY,
    codvta VARCHAR(15) NOT NULL UNIQUE,
    deno VARCHAR(100) NOT NULL,
    unidad VARCHAR(10) NOT NULL DEFAULT 'UN',
    margen NUMERIC(10,2) NOT NULL DEFAULT 0,
    idaliiva INTEGER NOT NULL REFERENCES alicuotas_iva(id),
    proveedor_habitual_id INTEGER NOT NULL REFERENCES proveedores(id),
    acti VARCHAR(1) NOT NULL DEFAULT 'A' CHECK (acti IN ('A','I')),
    precio_lista_0 NUMERIC(15,2),
    precio_lista_0_manual BOOLEAN NOT NULL DEFAULT FALSE
);
";

const STOCK_PROVE_SQL: &str = r"
CREATE TABLE stock_prove (
    id SERIAL PRIMARY KEY,
    stock_id INTEGER NOT NULL REFERENCES stock(id),
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    costo NUMERIC(15,4) NOT NULL DEFAULT 0,
    cantidad NUMERIC(15,2) NOT NULL DEFAULT 0,
    codigo_producto_proveedor VARCHAR(40),
    fecha_ultima_compra DATE,
    UNIQUE (stock_id, proveedor_id)
);
";

const LISTAS_PRECIO_SQL: &str = r"
CREATE TABLE listas_precio (
    id SERIAL PRIMARY KEY,
    numero SMALLINT NOT NULL UNIQUE CHECK (numero BETWEEN 0 AND 4),
    nombre VARCHAR(40) NOT NULL,
    margen_descuento NUMERIC(6,2) NOT NULL DEFAULT 0,
    activa BOOLEAN NOT NULL DEFAULT TRUE
);
";

const PRECIOS_PRODUCTO_LISTA_SQL: &str = r"
CREATE TABLE precios_producto_lista (
    id SERIAL PRIMARY KEY,
    stock_id INTEGER NOT NULL REFERENCES stock(id),
    lista_numero SMALLINT NOT NULL CHECK (lista_numero BETWEEN 0 AND 4),
    precio NUMERIC(15,2) NOT NULL,
    precio_manual BOOLEAN NOT NULL DEFAULT FALSE,
    usuario VARCHAR(60),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (stock_id, lista_numero)
);
";

const ACTUALIZACIONES_LISTA_SQL: &str = r"
CREATE TABLE actualizaciones_lista (
    id SERIAL PRIMARY KEY,
    lista_numero SMALLINT NOT NULL,
    margen_anterior NUMERIC(6,2) NOT NULL,
    margen_nuevo NUMERIC(6,2) NOT NULL,
    productos_recalculados INTEGER NOT NULL,
    productos_manuales_omitidos INTEGER NOT NULL,
    usuario VARCHAR(60),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const VENTAS_SQL: &str = r"
CREATE TABLE ventas (
    id SERIAL PRIMARY KEY,
    sucursal SMALLINT NOT NULL DEFAULT 1,
    fecha DATE NOT NULL,
    hora_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    comprobante_id INTEGER NOT NULL REFERENCES comprobantes(id),
    ven_punto INTEGER NOT NULL CHECK (ven_punto BETWEEN 1 AND 9999),
    ven_numero BIGINT NOT NULL CHECK (ven_numero >= 1),
    cliente_id INTEGER REFERENCES clientes(id),
    cuit VARCHAR(13),
    dni VARCHAR(10),
    razon_social VARCHAR(100),
    domicilio VARCHAR(150),
    tipo_iva_id INTEGER,
    ven_descu1 NUMERIC(5,2) NOT NULL DEFAULT 0,
    ven_descu2 NUMERIC(5,2) NOT NULL DEFAULT 0,
    ven_descu3 NUMERIC(5,2) NOT NULL DEFAULT 0,
    ven_descuento_cierre NUMERIC(15,2) NOT NULL DEFAULT 0,
    bonificacion_general NUMERIC(15,2) NOT NULL DEFAULT 0,
    observacion TEXT,
    estado VARCHAR(2) NOT NULL DEFAULT 'AB' CHECK (estado IN ('AB','AN')),
    cae VARCHAR(14),
    cae_vencimiento DATE,
    qr_payload TEXT,
    vencimiento DATE,
    convertida_a_fiscal BOOLEAN NOT NULL DEFAULT FALSE,
    factura_fiscal_convertida INTEGER REFERENCES ventas(id),
    fecha_conversion TIMESTAMPTZ,
    cobro_bruto NUMERIC(15,2),
    vuelto_calculado NUMERIC(15,2),
    excedente_destino VARCHAR(20) CHECK (excedente_destino IN ('vuelto','propina','vuelto_pendiente')),
    excedente_justificacion TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Numbering is unique among non-voided documents only.
CREATE UNIQUE INDEX idx_ventas_numeracion
    ON ventas (comprobante_id, ven_punto, ven_numero)
    WHERE estado <> 'AN';

CREATE INDEX idx_ventas_cliente ON ventas (cliente_id, fecha);
";

const VENTA_DETALLE_ITEMS_SQL: &str = r"
CREATE TABLE venta_detalle_items (
    id SERIAL PRIMARY KEY,
    vdi_idve INTEGER NOT NULL REFERENCES ventas(id) ON DELETE CASCADE,
    vdi_orden INTEGER NOT NULL,
    vdi_idsto INTEGER REFERENCES stock(id),
    vdi_idpro INTEGER REFERENCES proveedores(id),
    vdi_cantidad NUMERIC(15,2) NOT NULL,
    vdi_costo NUMERIC(15,4) NOT NULL DEFAULT 0,
    vdi_margen NUMERIC(10,2) NOT NULL DEFAULT 0,
    vdi_bonifica NUMERIC(5,2) NOT NULL DEFAULT 0,
    vdi_detalle1 VARCHAR(100) NOT NULL,
    vdi_detalle2 VARCHAR(40),
    vdi_idaliiva INTEGER NOT NULL REFERENCES alicuotas_iva(id),
    vdi_precio_unitario_final NUMERIC(15,4),
    UNIQUE (vdi_idve, vdi_orden)
);
";

const VENTA_CONTADORES_SQL: &str = r"
CREATE TABLE venta_contadores (
    id SERIAL PRIMARY KEY,
    comprobante_tipo VARCHAR(30) NOT NULL,
    letra VARCHAR(1) NOT NULL,
    punto INTEGER NOT NULL,
    ultimo BIGINT NOT NULL DEFAULT 0,
    UNIQUE (comprobante_tipo, letra, punto)
);
";

const COMPROBANTE_ASOCIACIONES_SQL: &str = r"
CREATE TABLE comprobante_asociaciones (
    id SERIAL PRIMARY KEY,
    factura_afectada INTEGER NOT NULL REFERENCES ventas(id),
    nota_credito INTEGER REFERENCES ventas(id),
    nota_debito INTEGER REFERENCES ventas(id),
    CHECK ((nota_credito IS NULL) <> (nota_debito IS NULL))
);
";

const RECIBOS_SQL: &str = r"
CREATE TABLE recibos (
    id SERIAL PRIMARY KEY,
    cliente_id INTEGER NOT NULL REFERENCES clientes(id),
    fecha DATE NOT NULL,
    hora_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    punto INTEGER NOT NULL,
    numero BIGINT NOT NULL,
    total NUMERIC(15,2) NOT NULL DEFAULT 0,
    observacion TEXT,
    estado VARCHAR(2) NOT NULL DEFAULT 'AB' CHECK (estado IN ('AB','AN'))
);
";

const ORDENES_PAGO_SQL: &str = r"
CREATE TABLE ordenes_pago (
    id SERIAL PRIMARY KEY,
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    fecha DATE NOT NULL,
    hora_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    punto INTEGER NOT NULL,
    numero BIGINT NOT NULL,
    total NUMERIC(15,2) NOT NULL DEFAULT 0,
    sesion_caja_id INTEGER,
    observacion TEXT,
    estado VARCHAR(2) NOT NULL DEFAULT 'AB' CHECK (estado IN ('AB','AN'))
);
";

const AJUSTES_PROVEEDOR_SQL: &str = r"
CREATE TABLE ajustes_proveedor (
    id SERIAL PRIMARY KEY,
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    tipo VARCHAR(8) NOT NULL CHECK (tipo IN ('DEBITO','CREDITO')),
    estado VARCHAR(1) NOT NULL DEFAULT 'A' CHECK (estado IN ('A','I')),
    monto NUMERIC(15,2) NOT NULL CHECK (monto > 0),
    numero BIGINT NOT NULL,
    fecha DATE NOT NULL,
    hora_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    observacion TEXT
);
";

const IMPUTACIONES_SQL: &str = r"
CREATE TABLE imputaciones (
    id SERIAL PRIMARY KEY,
    imp_fecha DATE NOT NULL,
    imp_monto NUMERIC(15,2) NOT NULL CHECK (imp_monto > 0),
    imp_observacion TEXT,
    origen_kind VARCHAR(20) NOT NULL,
    origen_id INTEGER NOT NULL,
    destino_kind VARCHAR(20) NOT NULL,
    destino_id INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_imputaciones_origen ON imputaciones (origen_kind, origen_id);
CREATE INDEX idx_imputaciones_destino ON imputaciones (destino_kind, destino_id);
";

const COMPRAS_SQL: &str = r"
CREATE TABLE compras (
    id SERIAL PRIMARY KEY,
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    fecha DATE NOT NULL,
    hora_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    comp_numero_factura VARCHAR(20) NOT NULL,
    estado VARCHAR(10) NOT NULL DEFAULT 'BORRADOR' CHECK (estado IN ('BORRADOR','CERRADA','ANULADA')),
    comp_neto NUMERIC(15,2) NOT NULL DEFAULT 0,
    comp_iva_21 NUMERIC(15,2) NOT NULL DEFAULT 0,
    comp_iva_105 NUMERIC(15,2) NOT NULL DEFAULT 0,
    comp_iva_27 NUMERIC(15,2) NOT NULL DEFAULT 0,
    comp_total NUMERIC(15,2) NOT NULL DEFAULT 0,
    comp_verificacion NUMERIC(15,2) NOT NULL DEFAULT 0,
    observacion TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (comp_numero_factura, proveedor_id)
);
";

const COMPRA_DETALLE_ITEMS_SQL: &str = r"
CREATE TABLE compra_detalle_items (
    id SERIAL PRIMARY KEY,
    cdi_idco INTEGER NOT NULL REFERENCES compras(id) ON DELETE CASCADE,
    cdi_orden INTEGER NOT NULL,
    cdi_idsto INTEGER REFERENCES stock(id),
    cdi_cantidad NUMERIC(15,2) NOT NULL,
    cdi_costo NUMERIC(15,4) NOT NULL DEFAULT 0,
    cdi_detalle1 VARCHAR(100) NOT NULL,
    UNIQUE (cdi_idco, cdi_orden)
);
";

const ORDENES_COMPRA_SQL: &str = r"
CREATE TABLE ordenes_compra (
    id SERIAL PRIMARY KEY,
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    fecha DATE NOT NULL,
    punto INTEGER NOT NULL,
    numero BIGINT NOT NULL,
    estado VARCHAR(10) NOT NULL DEFAULT 'ABIERTO' CHECK (estado IN ('ABIERTO','CERRADO')),
    observacion TEXT,
    UNIQUE (punto, numero)
);
";

const ORDEN_COMPRA_ITEMS_SQL: &str = r"
CREATE TABLE orden_compra_items (
    id SERIAL PRIMARY KEY,
    oci_idoc INTEGER NOT NULL REFERENCES ordenes_compra(id) ON DELETE CASCADE,
    oci_orden INTEGER NOT NULL,
    oci_idsto INTEGER REFERENCES stock(id),
    oci_cantidad NUMERIC(15,2) NOT NULL,
    oci_detalle1 VARCHAR(100) NOT NULL,
    UNIQUE (oci_idoc, oci_orden)
);
";

const RESERVAS_STOCK_SQL: &str = r"
CREATE TABLE reservas_stock (
    id SERIAL PRIMARY KEY,
    stock_id INTEGER NOT NULL REFERENCES stock(id),
    proveedor_id INTEGER NOT NULL REFERENCES proveedores(id),
    cantidad NUMERIC(15,2) NOT NULL CHECK (cantidad > 0),
    usuario VARCHAR(60) NOT NULL,
    sesion UUID NOT NULL,
    creada_en TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    expira_en TIMESTAMPTZ NOT NULL,
    estado VARCHAR(10) NOT NULL DEFAULT 'activa' CHECK (estado IN ('activa','confirmada','cancelada','expirada')),
    venta_id INTEGER REFERENCES ventas(id)
);

CREATE INDEX idx_reservas_activas ON reservas_stock (stock_id, proveedor_id) WHERE estado = 'activa';
";

const FORM_LOCKS_SQL: &str = r"
CREATE TABLE form_locks (
    id SERIAL PRIMARY KEY,
    tipo VARCHAR(15) NOT NULL CHECK (tipo IN ('venta','presupuesto','conversion')),
    usuario VARCHAR(60) NOT NULL,
    sesion UUID NOT NULL,
    presupuesto_id INTEGER REFERENCES ventas(id),
    adquirido_en TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    expira_en TIMESTAMPTZ NOT NULL
);

-- One live lock per document; expired rows are purged on acquisition.
CREATE UNIQUE INDEX idx_form_locks_unico ON form_locks (tipo, presupuesto_id);
";

const SESIONES_CAJA_SQL: &str = r"
CREATE TABLE sesiones_caja (
    id SERIAL PRIMARY KEY,
    usuario VARCHAR(60) NOT NULL,
    abierta_en TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    cerrada_en TIMESTAMPTZ,
    saldo_inicial NUMERIC(15,2) NOT NULL DEFAULT 0,
    saldo_cierre NUMERIC(15,2),
    estado VARCHAR(10) NOT NULL DEFAULT 'ABIERTA' CHECK (estado IN ('ABIERTA','CERRADA'))
);
";

const METODOS_PAGO_SQL: &str = r"
CREATE TABLE metodos_pago (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(40) NOT NULL UNIQUE,
    afecta_arqueo BOOLEAN NOT NULL DEFAULT TRUE,
    activo BOOLEAN NOT NULL DEFAULT TRUE
);
";

const MOVIMIENTOS_CAJA_SQL: &str = r"
CREATE TABLE movimientos_caja (
    id SERIAL PRIMARY KEY,
    sesion_id INTEGER NOT NULL REFERENCES sesiones_caja(id),
    tipo VARCHAR(10) NOT NULL CHECK (tipo IN ('INGRESO','EGRESO')),
    concepto VARCHAR(100) NOT NULL,
    monto NUMERIC(15,2) NOT NULL CHECK (monto > 0),
    metodo_pago_id INTEGER REFERENCES metodos_pago(id),
    venta_id INTEGER REFERENCES ventas(id),
    orden_pago_id INTEGER REFERENCES ordenes_pago(id),
    creado_en TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PAGOS_VENTA_SQL: &str = r"
CREATE TABLE pagos_venta (
    id SERIAL PRIMARY KEY,
    venta_id INTEGER NOT NULL REFERENCES ventas(id),
    metodo_pago_id INTEGER NOT NULL REFERENCES metodos_pago(id),
    monto NUMERIC(15,2) NOT NULL CHECK (monto > 0),
    creado_en TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CHEQUES_SQL: &str = r"
CREATE TABLE cheques (
    id SERIAL PRIMARY KEY,
    numero VARCHAR(20) NOT NULL,
    banco VARCHAR(60) NOT NULL,
    importe NUMERIC(15,2) NOT NULL CHECK (importe > 0),
    fecha_emision DATE NOT NULL,
    fecha_cobro DATE,
    estado VARCHAR(12) NOT NULL DEFAULT 'EN_CARTERA'
        CHECK (estado IN ('EN_CARTERA','ENDOSADO','DEPOSITADO','RECHAZADO','COBRADO')),
    endosado_a VARCHAR(60),
    proveedor_id INTEGER REFERENCES proveedores(id),
    cliente_id INTEGER REFERENCES clientes(id),
    nota_debito_id INTEGER REFERENCES ventas(id),
    creado_en TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SEED_SQL: &str = r"
INSERT INTO alicuotas_iva (codigo, deno, porce) VALUES
    ('3', 'IVA 0%', 0),
    ('9', 'IVA 2.5%', 2.5),
    ('8', 'IVA 5%', 5),
    ('4', 'IVA 10.5%', 10.5),
    ('5', 'IVA 21%', 21),
    ('6', 'IVA 27%', 27);

INSERT INTO listas_precio (numero, nombre, margen_descuento) VALUES
    (0, 'Lista base', 0),
    (1, 'Lista 1', 0),
    (2, 'Lista 2', 0),
    (3, 'Lista 3', 0),
    (4, 'Lista 4', 0);

INSERT INTO comprobantes (codigo_afip, nombre, letra, tipo) VALUES
    ('001', 'Factura A', 'A', 'factura'),
    ('002', 'Nota de Débito A', 'A', 'nota_debito'),
    ('003', 'Nota de Crédito A', 'A', 'nota_credito'),
    ('006', 'Factura B', 'B', 'factura'),
    ('007', 'Nota de Débito B', 'B', 'nota_debito'),
    ('008', 'Nota de Crédito B', 'B', 'nota_credito'),
    ('011', 'Factura C', 'C', 'factura'),
    ('012', 'Nota de Débito C', 'C', 'nota_debito'),
    ('013', 'Nota de Crédito C', 'C', 'nota_credito'),
    ('9997', 'Factura Interna', 'I', 'factura_interna'),
    ('9996', 'Nota de Crédito Interna', 'I', 'nota_credito_interna'),
    ('9995', 'Nota de Débito Interna', 'I', 'nota_debito_interna'),
    ('9998', 'Presupuesto', 'P', 'presupuesto'),
    ('9994', 'Recibo', 'I', 'recibo'),
    ('9993', 'Orden de Compra', 'O', 'orden_compra');

INSERT INTO metodos_pago (nombre, afecta_arqueo) VALUES
    ('Efectivo', TRUE),
    ('Transferencia', FALSE),
    ('Tarjeta de débito', FALSE),
    ('Tarjeta de crédito', FALSE),
    ('Cheque', FALSE);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS cheques;
DROP TABLE IF EXISTS pagos_venta;
DROP TABLE IF EXISTS movimientos_caja;
DROP TABLE IF EXISTS metodos_pago;
DROP TABLE IF EXISTS sesiones_caja;
DROP TABLE IF EXISTS form_locks;
DROP TABLE IF EXISTS reservas_stock;
DROP TABLE IF EXISTS orden_compra_items;
DROP TABLE IF EXISTS ordenes_compra;
DROP TABLE IF EXISTS compra_detalle_items;
DROP TABLE IF EXISTS compras;
DROP TABLE IF EXISTS imputaciones;
DROP TABLE IF EXISTS ajustes_proveedor;
DROP TABLE IF EXISTS ordenes_pago;
DROP TABLE IF EXISTS recibos;
DROP TABLE IF EXISTS comprobante_asociaciones;
DROP TABLE IF EXISTS venta_contadores;
DROP TABLE IF EXISTS venta_detalle_items;
DROP TABLE IF EXISTS ventas;
DROP TABLE IF EXISTS actualizaciones_lista;
DROP TABLE IF EXISTS precios_producto_lista;
DROP TABLE IF EXISTS listas_precio;
DROP TABLE IF EXISTS stock_prove;
DROP TABLE IF EXISTS stock;
DROP TABLE IF EXISTS proveedores;
DROP TABLE IF EXISTS clientes;
DROP TABLE IF EXISTS ferreterias;
DROP TABLE IF EXISTS comprobantes;
DROP TABLE IF EXISTS alicuotas_iva;
";
