//! Antibiotic definitions and their Neofax dosage tables.

use crate::dosing::Bound::{Above, AtLeast, AtMost, Below};
use crate::dosing::{Criteria, NoteTemplate, RuleTable};
use crate::models::{Antibiotic, DosageLeaf, DoseRule, Interval};

const TOTAL: &str = "Dose total diária";
const TOTAL_APPROX: &str = "Dose total diária aproximada";

const Q6H: Interval = Interval::new(6, "6 horas");
const Q8H: Interval = Interval::new(8, "8 horas");
const Q12H: Interval = Interval::new(12, "12 horas");
const Q18H: Interval = Interval::new(18, "18 horas");
const Q20H: Interval = Interval::new(20, "20 horas");
const Q24H: Interval = Interval::new(24, "24 horas");
const Q30H: Interval = Interval::new(30, "30 horas");
const Q36H: Interval = Interval::new(36, "36 horas");
const Q42H: Interval = Interval::new(42, "42 horas");
const Q48H: Interval = Interval::new(48, "48 horas");

/// All antibiotics in display order.
pub fn standard_antibiotics() -> Vec<Antibiotic> {
    vec![
        ampicillin(),
        gentamicin(),
        amikacin(),
        vancomycin(),
        cefotaxime(),
        meropenem(),
        piperacillin_tazobactam(),
    ]
}

fn ampicillin() -> Antibiotic {
    const DOSE: DoseRule = DoseRule::new(50.0, "50 mg/kg/dose");

    let notes = NoteTemplate::new(
        "Para meningite: 100 mg/kg/dose IV a cada 8 horas para recém-nascidos ≤ 7 dias ou 75 mg/kg/dose IV a cada 6 horas para > 7 dias.\n",
        TOTAL,
        "",
        "\n\nUsos: Sepse neonatal precoce (com aminoglicosídeo), infecções por estreptococos do grupo B, Listeria monocytogenes e E. coli suscetível.\
         \nAmpicilina é o antibiótico alternativo após penicilina G para doença por estreptococos do grupo B.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::ga(AtMost(29.0)).and_pna(AtMost(28.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtMost(29.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::ga(AtMost(36.0)).and_pna(AtMost(14.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtMost(36.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::ga(AtMost(44.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtMost(44.0)), DosageLeaf::new(DOSE, Q8H))
        .otherwise(DosageLeaf::new(DOSE, Q6H));

    Antibiotic::new(
        "ampicillin",
        "Ampicilina",
        104,
        "Antibiótico beta-lactâmico de amplo espectro eficaz contra grupo B Streptococcus, Listeria monocytogenes e cepas suscetíveis de E. coli.",
        rules,
    )
}

fn gentamicin() -> Antibiotic {
    const DOSE_5: DoseRule = DoseRule::new(5.0, "5 mg/kg/dose");
    const DOSE_4_5: DoseRule = DoseRule::new(4.5, "4.5 mg/kg/dose");
    const DOSE_4: DoseRule = DoseRule::new(4.0, "4 mg/kg/dose");

    let notes = NoteTemplate::new(
        "",
        TOTAL_APPROX,
        "",
        "\nMonitorização recomendada: Concentração de pico (1h após término da infusão) 6-12 mcg/mL, vale (pré-dose) <2 mcg/mL.\
         \nInfundir durante 30 minutos. Não misturar com penicilinas na mesma infusão.\
         \n\nAtenção: Risco de nefrotoxicidade e ototoxicidade, especialmente com uso prolongado ou em combinação com outros medicamentos nefrotóxicos.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::ga(AtMost(29.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE_5, Q48H))
        .when(Criteria::ga(AtMost(29.0)).and_pna(AtMost(28.0)), DosageLeaf::new(DOSE_4, Q36H))
        .when(Criteria::ga(AtMost(29.0)), DosageLeaf::new(DOSE_4, Q24H))
        .when(Criteria::ga(AtMost(34.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE_4_5, Q36H))
        .when(Criteria::ga(AtMost(34.0)), DosageLeaf::new(DOSE_4, Q24H))
        .when(Criteria::pna(AtMost(7.0)), DosageLeaf::new(DOSE_4, Q24H))
        .otherwise(DosageLeaf::new(DOSE_4, Q18H));

    Antibiotic::new(
        "gentamicin",
        "Gentamicina",
        448,
        "Antibiótico aminoglicosídeo usado para tratar infecções causadas por bactérias gram-negativas. Frequentemente utilizado em combinação com ampicilina para sepse neonatal.",
        rules,
    )
}

fn amikacin() -> Antibiotic {
    const DOSE_16: DoseRule = DoseRule::new(16.0, "16 mg/kg/dose");
    const DOSE_20: DoseRule = DoseRule::new(20.0, "20 mg/kg/dose");
    const DOSE_15: DoseRule = DoseRule::new(15.0, "15 mg/kg/dose");
    const DOSE_18: DoseRule = DoseRule::new(18.0, "18 mg/kg/dose");

    let notes = NoteTemplate::new(
        "",
        TOTAL_APPROX,
        "",
        "\nConcentrações-alvo: Pico (1h após término da infusão): >24 mg/L, Vale (pré-dose): <3 mg/L\
         \nDiluir para concentração final de 2,5-10 mg/mL e administrar por infusão IV em 60-120 minutos.\
         \nAdministrar separadamente de compostos contendo penicilina.",
    );

    // Weight bands are written in grams but compared against the weight in
    // kilograms, so every patient in range lands in the first band. Kept as
    // published until the unit is confirmed.
    let rules = RuleTable::builder(notes)
        .when(Criteria::weight(AtMost(800.0)).and_pna(Below(14.0)), DosageLeaf::new(DOSE_16, Q48H))
        .when(Criteria::weight(AtMost(800.0)), DosageLeaf::new(DOSE_20, Q42H))
        .when(Criteria::weight(AtMost(1200.0)).and_pna(Below(14.0)), DosageLeaf::new(DOSE_16, Q42H))
        .when(Criteria::weight(AtMost(1200.0)), DosageLeaf::new(DOSE_20, Q36H))
        .when(Criteria::weight(AtMost(2000.0)).and_pna(Below(14.0)), DosageLeaf::new(DOSE_15, Q36H))
        .when(Criteria::weight(AtMost(2000.0)), DosageLeaf::new(DOSE_18, Q30H))
        .when(Criteria::weight(AtMost(2800.0)).and_pna(Below(14.0)), DosageLeaf::new(DOSE_15, Q36H))
        .when(Criteria::weight(AtMost(2800.0)), DosageLeaf::new(DOSE_18, Q24H))
        .when(Criteria::pna(Below(14.0)), DosageLeaf::new(DOSE_15, Q30H))
        .otherwise(DosageLeaf::new(DOSE_18, Q20H));

    Antibiotic::new(
        "amikacin",
        "Amicacina",
        59,
        "Antibiótico aminoglicosídeo usado para tratar infecções graves por bactérias gram-negativas resistentes a outros aminoglicosídeos. Maior espectro de atividade contra Pseudomonas e outros organismos resistentes.",
        rules,
    )
}

fn vancomycin() -> Antibiotic {
    const DOSE: DoseRule = DoseRule::new(15.0, "15 mg/kg/dose");

    let notes = NoteTemplate::new(
        "",
        TOTAL_APPROX,
        "",
        "\nInfusão: administrar durante 60 minutos.\
         \nAjuste com base nos níveis séricos. Concentrações-alvo: vale 5-15 mcg/mL para infecções comuns; 15-20 mcg/mL para infecções graves.\
         \nMonitorar função renal. Risco aumentado de toxicidade com outros medicamentos nefrotóxicos.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::pna(AtMost(7.0)).and_weight(Below(1.2)), DosageLeaf::new(DOSE, Q24H))
        .when(Criteria::pna(AtMost(7.0)).and_ga(Below(32.0)), DosageLeaf::new(DOSE, Q18H))
        .when(Criteria::pna(AtMost(7.0)).and_ga(AtMost(36.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::pna(AtMost(28.0)).and_weight(Below(1.2)), DosageLeaf::new(DOSE, Q18H))
        .when(Criteria::pna(AtMost(28.0)).and_ga(Below(32.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::pna(AtMost(28.0)).and_ga(AtMost(36.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::pna(AtMost(28.0)), DosageLeaf::new(DOSE, Q6H))
        .when(Criteria::weight(Below(1.2)), DosageLeaf::new(DOSE, Q12H))
        .otherwise(DosageLeaf::new(DOSE, Q8H));

    Antibiotic::new(
        "vancomycin",
        "Vancomicina",
        905,
        "Antibiótico glicopeptídeo usado principalmente para infecções por bactérias gram-positivas resistentes, como Staphylococcus aureus resistente à meticilina (MRSA).",
        rules,
    )
}

fn cefotaxime() -> Antibiotic {
    const DOSE: DoseRule = DoseRule::new(50.0, "50 mg/kg/dose");

    let notes = NoteTemplate::new(
        "Para meningite, utilize dose de 50 mg/kg/dose a cada 6-8 horas independente da idade gestacional.\n",
        TOTAL,
        "",
        "\nFrequentemente utilizado em combinação com ampicilina para cobertura de meningite bacteriana neonatal.\
         \nBoa cobertura contra organismos gram-negativos, incluindo E. coli e Klebsiella.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::pna(AtMost(7.0)).and_ga(Below(32.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::pna(AtMost(21.0)).and_ga(Below(32.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::pna(AtMost(21.0)), DosageLeaf::new(DOSE, Q6H))
        .otherwise(DosageLeaf::new(DOSE, Q6H));

    Antibiotic::new(
        "cefotaxime",
        "Cefotaxima",
        209,
        "Cefalosporina de terceira geração com amplo espectro contra bactérias gram-negativas e gram-positivas. Boa penetração no líquido cefalorraquidiano.",
        rules,
    )
}

fn meropenem() -> Antibiotic {
    const DOSE: DoseRule = DoseRule::new(20.0, "20 mg/kg/dose");

    let notes = NoteTemplate::new(
        "Para meningite e infecções graves por Pseudomonas, utilize 40 mg/kg/dose mantendo o mesmo intervalo.\
         \nAdministrar durante 30 minutos por infusão intravenosa.\n",
        TOTAL_APPROX,
        "",
        "\nPreferido para tratamento de infecções graves do sistema nervoso central por seu excelente perfil de segurança e penetração no líquido cefalorraquidiano.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::ga(Below(32.0)).and_pna(AtMost(14.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtLeast(32.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtLeast(32.0)).and_pna(Above(7.0)), DosageLeaf::new(DOSE, Q8H))
        .otherwise(DosageLeaf::new(DOSE, Q8H));

    Antibiotic::new(
        "meropenem",
        "Meropenem",
        603,
        "Antibiótico carbapenêmico de amplo espectro com atividade contra gram-positivos, gram-negativos e anaeróbios. Útil para infecções graves, incluindo infecções resistentes.",
        rules,
    )
}

fn piperacillin_tazobactam() -> Antibiotic {
    const DOSE: DoseRule = DoseRule::new(100.0, "100 mg/kg/dose de piperacilina");

    let notes = NoteTemplate::new(
        "Administrar durante 30 minutos por infusão intravenosa.\
         \nA dose é expressa como o componente piperacilina, com tazobactam em proporção fixa de 8:1.\n",
        TOTAL_APPROX,
        " de piperacilina",
        "\nÚtil para infecções nosocomiais e infecções por patógenos resistentes. Boa cobertura contra Pseudomonas aeruginosa.",
    );

    let rules = RuleTable::builder(notes)
        .when(Criteria::ga(AtMost(32.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q12H))
        .when(Criteria::ga(AtMost(32.0)).and_pna(Above(7.0)), DosageLeaf::new(DOSE, Q8H))
        .when(Criteria::ga(Above(32.0)).and_pna(AtMost(7.0)), DosageLeaf::new(DOSE, Q8H))
        .otherwise(DosageLeaf::new(DOSE, Q6H));

    Antibiotic::new(
        "piperacillin_tazobactam",
        "Piperacilina-Tazobactam",
        770,
        "Combinação de piperacilina (penicilina de amplo espectro) com tazobactam (inibidor de beta-lactamase). Ativo contra muitos organismos gram-positivos, gram-negativos e anaeróbios.",
        rules,
    )
}
