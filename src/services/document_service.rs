// src/services/document_service.rs

use std::sync::Arc;

use genpdf::{elements, style, Element};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MaintenanceStore, VehicleStore},
    models::{maintenance::MaintenanceRecord, vehicle::Vehicle},
    services::vehicle_service::find_owned_vehicle,
};

pub const CSV_HEADER: [&str; 5] = ["data", "servico", "km", "custo", "observacoes"];

#[derive(Clone)]
pub struct DocumentService {
    vehicles: Arc<dyn VehicleStore>,
    maintenances: Arc<dyn MaintenanceStore>,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(
        vehicles: Arc<dyn VehicleStore>,
        maintenances: Arc<dyn MaintenanceStore>,
        fonts_dir: String,
    ) -> Self {
        Self { vehicles, maintenances, fonts_dir }
    }

    async fn load(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<(Vehicle, Vec<MaintenanceRecord>), AppError> {
        let vehicle = find_owned_vehicle(self.vehicles.as_ref(), user_id, vehicle_id).await?;
        let records = self.maintenances.list_maintenances(vehicle_id).await?;
        Ok((vehicle, records))
    }

    pub async fn export_csv(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<(Vehicle, Vec<u8>), AppError> {
        let (vehicle, records) = self.load(user_id, vehicle_id).await?;
        let bytes = maintenances_to_csv(&records)?;
        Ok((vehicle, bytes))
    }

    pub async fn export_pdf(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<(Vehicle, Vec<u8>), AppError> {
        let (vehicle, records) = self.load(user_id, vehicle_id).await?;
        let bytes = self.render_history_pdf(&vehicle, &records)?;
        Ok((vehicle, bytes))
    }

    fn render_history_pdf(&self, vehicle: &Vehicle, records: &[MaintenanceRecord]) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada (FONTS_DIR)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|e| AppError::ExportError(format!("Fonte não encontrada em {}: {}", self.fonts_dir, e)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Histórico de manutenções - {}", vehicle.plate));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new("HISTÓRICO DE MANUTENÇÕES")
            .styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(format!("{} - Placa {}", vehicle.display_name(), vehicle.plate)));
        doc.push(elements::Paragraph::new(format!(
            "Km inicial: {}   Km atual: {}",
            vehicle.initial_km, vehicle.current_km
        )));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        // Pesos das colunas: Data (2), Serviço (5), Km (2), Custo (2)
        let mut table = elements::TableLayout::new(vec![2, 5, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table.row()
            .element(elements::Paragraph::new("Data").styled(style_bold))
            .element(elements::Paragraph::new("Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Km").styled(style_bold))
            .element(elements::Paragraph::new("Custo").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for record in records {
            table.row()
                .element(elements::Paragraph::new(record.performed_on.format("%d/%m/%Y").to_string()))
                .element(elements::Paragraph::new(record.service_type.clone()))
                .element(elements::Paragraph::new(record.km.to_string()))
                .element(elements::Paragraph::new(format!("R$ {:.2}", record.cost)))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total = elements::Paragraph::new(format!("TOTAL GASTO: R$ {:.2}", total_cost(records)));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::ExportError(e.to_string())
}

pub fn total_cost(records: &[MaintenanceRecord]) -> Decimal {
    records.iter().map(|r| r.cost).sum()
}

/// Histórico em CSV: datas dd/mm/aaaa e custo com duas casas.
pub fn maintenances_to_csv(records: &[MaintenanceRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record([
            record.performed_on.format("%d/%m/%Y").to_string(),
            record.service_type.clone(),
            record.km.to_string(),
            format!("{:.2}", record.cost),
            record.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(e.to_string()))
}
