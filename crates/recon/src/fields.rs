//! Field-alias tables: logical field → accepted header spellings.
//!
//! Spellings are in normalized-header form (lowercase, diacritics folded,
//! punctuation dropped), so "FECHA DE EMISIÓN", "Fecha de emision" and
//! "fecha_de_emision" all hit the same entry. Only genuinely distinct
//! spellings need their own row.

/// Receivable ("cartera") sheet columns.
pub mod receivable {
    pub const INSURER: &[&str] = &["aseguradora"];
    pub const CLIENT: &[&str] = &["nombre", "cliente"];
    pub const DOCUMENT: &[&str] = &["documento"];
    pub const ADVISOR: &[&str] = &["asesor"];
    pub const PLATE: &[&str] = &["placa"];
    pub const LINE: &[&str] = &["ramo"];
    pub const POLICY: &[&str] = &["poliza"];
    pub const ISSUE_DATE: &[&str] = &["fechadeemision", "fechaemision"];
    pub const DUE_DATE: &[&str] = &["fechadevencimiento", "fechavencimiento"];
    pub const AMOUNT: &[&str] = &["valor"];
    pub const PENDING: &[&str] = &["pendiente"];
    pub const COLLECTED: &[&str] = &["recaudada"];
    pub const OBSERVATION: &[&str] = &["observacion", "observaciones"];
    pub const IN_FORCE: &[&str] = &["vigente"];
}

/// Policy ("póliza") sheet columns.
pub mod policy {
    pub const INSURER: &[&str] = &["aseguradora"];
    pub const POLICY: &[&str] = &["poliza"];
    pub const LINE: &[&str] = &["ramo"];
    pub const PLATE: &[&str] = &["placa"];
    pub const INSURED: &[&str] = &["asegurado"];
    pub const INSURED_ID: &[&str] = &["idasegurado"];
    pub const BENEFICIARY: &[&str] = &["beneficiario"];
    pub const BENEFICIARY_ID: &[&str] = &["idbeneficiario"];
    pub const HOLDER: &[&str] = &["tomador"];
    pub const HOLDER_ID: &[&str] = &["idtomador"];
    pub const ISSUED_ON: &[&str] = &["fechaexpedicion", "fechadeexpedicion"];
    pub const STARTS_ON: &[&str] = &["fechainicio", "fechadeinicio"];
    pub const ENDS_ON: &[&str] = &["fechafin", "fechaterminacion", "fechadefin"];
    pub const PREMIUM: &[&str] = &["prima"];
    pub const ISSUE_COSTS: &[&str] = &["gastosexpedicion", "gastosexp"];
    pub const VAT: &[&str] = &["iva"];
    pub const TOTAL: &[&str] = &["total"];
    pub const ADVISOR: &[&str] = &["asesor"];
    pub const VOIDED: &[&str] = &["anulada"];
    pub const RENEWAL: &[&str] = &["renovacion"];
    pub const COMMISSION: &[&str] = &["comision"];
    pub const PHONE: &[&str] = &["telefono"];
    pub const NOTES: &[&str] = &["gestion"];
}
