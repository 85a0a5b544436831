use serde::Serialize;

/// A disease descriptor consumed by the menu and prediction surfaces.
///
/// `icon`, `color` and `accent_color` are presentation tokens the frontend
/// resolves; the backend treats them as opaque strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub accent_color: &'static str,
}

/// The static disease catalog, loaded at process start and never mutated.
pub const DISEASES: &[Disease] = &[
    Disease {
        id: "rabies",
        name: "Rabies",
        description: "Analisis dan prediksi penyebaran virus rabies pada hewan.",
        icon: "rabies",
        color: "bg-red-600",
        accent_color: "red-400",
    },
    Disease {
        id: "avian-flu",
        name: "Flu Burung",
        description: "Pantau dan prediksi wabah flu burung (H5N1) pada unggas.",
        icon: "avian-flu",
        color: "bg-blue-600",
        accent_color: "blue-400",
    },
    Disease {
        id: "leptospirosis",
        name: "Leptospirosis",
        description: "Prediksi risiko Leptospirosis berdasarkan data lingkungan.",
        icon: "leptospirosis",
        color: "bg-yellow-500",
        accent_color: "yellow-400",
    },
    Disease {
        id: "anthrax",
        name: "Antraks",
        description: "Identifikasi potensi wabah Antraks pada ternak dan manusia.",
        icon: "anthrax",
        color: "bg-green-600",
        accent_color: "green-400",
    },
    Disease {
        id: "covid-19",
        name: "COVID-19",
        description: "Analisis & prediksi penyebaran COVID-19 berdasarkan data & intervensi.",
        icon: "virus",
        color: "bg-indigo-600",
        accent_color: "indigo-400",
    },
    Disease {
        id: "malaria",
        name: "Malaria",
        description: "Modelkan penyebaran Malaria berdasarkan data iklim dan kasus.",
        icon: "malaria",
        color: "bg-teal-600",
        accent_color: "teal-400",
    },
];

/// Look up a catalog entry by its id.
pub fn find_disease(id: &str) -> Option<&'static Disease> {
    DISEASES.iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_entries() {
        assert_eq!(DISEASES.len(), 6);
    }

    #[test]
    fn lookup_by_id() {
        let disease = find_disease("avian-flu").unwrap();
        assert_eq!(disease.name, "Flu Burung");
        assert!(find_disease("ebola").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in DISEASES.iter().enumerate() {
            for b in &DISEASES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
