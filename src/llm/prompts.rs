//! Cover letter prompt rendered from the submitted profile and job

use crate::error::{CoverLetterError, Result};
use crate::input::{ApplicantProfile, JobTarget, Temperature};
use askama::Template;
use serde::Serialize;

/// Fixed Danish scaffold. Sections run CV, job description, details, then
/// instructions; the instructions refer back to sections 1-3 instead of
/// repeating their contents.
#[derive(Template)]
#[template(
    source = r#"Opgave: Skriv et udkast til en professionel ansøgning på dansk.

Baser ansøgningen på følgende information:

1.  **Ansøgers CV/Erfaring:**
    ```
    {{ resume_text }}
    ```

2.  **Jobbeskrivelse for den søgte stilling:**
    ```
    {{ job_description }}
    ```

3.  **Detaljer:**
    *   Ansøgers Navn: {{ name }}
    *   Virksomhed: {{ company }}
    *   Stilling: {{ role }}
    *   Ansættende Leder: {{ manager }}
    *   Hvor stillingen blev fundet: {{ referral }}

**Instruktioner for ansøgningens struktur og indhold:**

*   **Sprog:** Dansk. Tonen skal være professionel, entusiastisk og skræddersyet til stillingen.
*   **Afsender:** Brug ansøgerens navn fra afsnit 3 som afsender.
*   **Modtager:** {% if manager_known %}Adresser brevet til den ansættende leder (f.eks. "Kære {{ manager }}").{% else %}Der er ikke angivet en ansættende leder. Brug en generel hilsen som "Vedrørende stillingen som [stillingen fra afsnit 3]" eller adresser brevet til HR-afdelingen, hvis det virker passende.{% endif %}
*   **Alinea 1 (Introduktion):**
    *   Præsenter dig selv med ansøgerens navn.
    *   Angiv klart den stilling fra afsnit 3, du søger.
    *   Nævn, hvor du så stillingsopslaget (afsnit 3), hvis angivet.
    *   Giv en kort opsummering af din mest relevante profil/kernekompetence i forhold til stillingen, baseret på CV'et.
*   **Alinea 2 (Motivation og Match):**
    *   Uddyb, hvorfor du er en god kandidat.
    *   TRÆK DIREKTE PARALLELLER mellem specifikke erfaringer/kvalifikationer fra CV'et (afsnit 1) og de krav/ønsker, der er nævnt i jobbeskrivelsen (afsnit 2). Vær konkret.
    *   Vis din motivation for netop denne stilling og virksomhed (afsnit 3).
*   **Alinea 3 (Afslutning):**
    *   Gentag din interesse for stillingen og virksomheden.
    *   Opsummer kort, hvad du kan tilbyde.
    *   Udtryk ønske om en samtale for at uddybe din ansøgning.
    *   Tak for modtagerens tid og overvejelse.
*   **Afsluttende Hilsen:** Brug en passende professionel hilsen (f.eks. "Med venlig hilsen") efterfulgt af ansøgerens navn.
*   **Kontaktinformation:** Inkludér *ikke* detaljeret kontaktinformation (som adresse, email, telefon) direkte i brødteksten, da dette typisk står i CV'et eller brevhovedet. Fokuser på selve ansøgningsteksten. Sørg dog for at brevet afsluttes med afsenderens navn.
*   **Formatering:** Sørg for passende linjeskift og luft mellem afsnittene for god læsbarhed.

Generer nu ansøgningsteksten baseret på ovenstående.
"#,
    ext = "txt",
    escape = "none"
)]
struct CoverLetterPrompt<'a> {
    resume_text: &'a str,
    job_description: &'a str,
    name: &'a str,
    company: &'a str,
    role: &'a str,
    manager: &'a str,
    referral: &'a str,
    manager_known: bool,
}

/// Render the prompt. User text is inserted as-is.
pub fn render_prompt(profile: &ApplicantProfile, job: &JobTarget) -> Result<String> {
    let template = CoverLetterPrompt {
        resume_text: &profile.resume_text,
        job_description: &job.job_description,
        name: &profile.name,
        company: &job.company,
        role: &job.role,
        manager: &job.manager,
        referral: &profile.referral_source,
        manager_known: job.manager_known(),
    };
    template
        .render()
        .map_err(|e| CoverLetterError::PromptRendering(e.to_string()))
}

/// Everything sent to the generation service for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: Temperature,
}

impl GenerationRequest {
    pub fn assemble(profile: &ApplicantProfile, job: &JobTarget, temperature: Temperature) -> Result<Self> {
        Ok(Self {
            prompt: render_prompt(profile, job)?,
            temperature,
        })
    }
}
