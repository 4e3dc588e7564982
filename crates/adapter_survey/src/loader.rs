//! Survey extract loading.

use incidence_core::types::MemberTable;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::record::RawMemberRecord;

/// Load a survey extract from a CSV file.
///
/// # Errors
///
/// - `Io` if the file cannot be opened
/// - see [`read_members`] for content errors
pub fn load_members(path: impl AsRef<Path>) -> Result<MemberTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Reading survey extract");
    read_members(file)
}

/// Read a survey extract from any CSV source with a header row.
///
/// Columns not used by the pipeline are ignored. Records that carry an
/// unknown sector code load with no sector and are counted in a warning.
///
/// # Errors
///
/// - `Csv` if the CSV is malformed
/// - `MissingField` / `InvalidField` for unusable required values
/// - `NoRecords` if there are no data rows
/// - `Table` if an expansion factor or household size is invalid
///
/// # Examples
///
/// ```
/// use adapter_survey::read_members;
///
/// let csv = "\
/// DIRECTORIO,SECUENCIA_P,HOGAR,edad,AREA_per,CLASE_per,seccion_2d,tipo_empresa,informales,cuenta_propia,P6430,P6050,DSI,INI,IMPA_y,IE_y,ISA_y,IOF_y,IMDI_y,personas_hogar,fac_exp_ind_12m,arriendo_estimado,ING_pc_bl_def_arriendo,cat_dom
/// 1,1,1,40,12344,1,4.0,2,1,0,1,1,,,900000,,,,,2,150.5,100000,500000,Cabecera
/// 1,1,1,38,12344,1,,,,,,2,,1,,,,,,2,140.0,100000,500000,Cabecera
/// ";
///
/// let members = read_members(csv.as_bytes()).unwrap();
/// assert_eq!(members.len(), 2);
/// assert_eq!(members.household_count(), 1);
/// assert!(members.get(1).unwrap().inactive);
/// ```
pub fn read_members<R: Read>(source: R) -> Result<MemberTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let mut members = Vec::new();
    let mut unknown_sectors = 0usize;

    let headers = reader.headers()?.clone();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        // Quoted fields may span lines, so count from where the record starts
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        let raw: RawMemberRecord = record.deserialize(Some(&headers))?;
        if raw.has_unknown_sector() {
            unknown_sectors += 1;
        }
        members.push(raw.into_member(line)?);
    }

    if members.is_empty() {
        return Err(LoadError::NoRecords);
    }
    if unknown_sectors > 0 {
        warn!(
            records = unknown_sectors,
            "Unknown sector codes loaded as missing"
        );
    }

    let table = MemberTable::new(members)?;
    info!(
        members = table.len(),
        households = table.household_count(),
        population = table.total_weight(),
        "Loaded survey extract"
    );
    Ok(table)
}
