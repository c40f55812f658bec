use crate::validation::WorkoutRequest;
use std::fmt::Write;

const INSTRUCTIONS: &str = r#"INSTRUÇÕES:
1. Crie um treino COMPLETO e PERSONALIZADO baseado nas informações acima
2. Adapte os exercícios ao equipamento disponível
3. Considere as limitações físicas informadas (se houver)
4. Ajuste a intensidade e volume ao tempo disponível (se informado)
5. Use linguagem motivacional e clara
6. Inclua orientações específicas para cada exercício

IMPORTANTE: Retorne APENAS um JSON válido, SEM texto adicional antes ou depois. O JSON deve seguir EXATAMENTE esta estrutura:

{
  "introducao": {
    "mensagem": "Mensagem motivacional personalizada de 2-3 linhas",
    "foco": "Resumo do foco do treino em 1 linha"
  },
  "aquecimento": [
    {
      "exercicio": "Nome do exercício de aquecimento",
      "duracao": "5-10 minutos",
      "orientacao": "Como executar corretamente"
    }
  ],
  "treino_principal": [
    {
      "exercicio": "Nome do exercício principal",
      "series": "3-4",
      "repeticoes": "8-12 ou tempo",
      "descanso": "30-90 segundos",
      "orientacao": "Técnica correta e dicas importantes"
    }
  ],
  "desaquecimento": [
    {
      "exercicio": "Nome do alongamento/desaquecimento",
      "duracao": "30-60 segundos",
      "orientacao": "Como executar o alongamento"
    }
  ]
}

REGRAS CRÍTICAS:
- O aquecimento deve ter 2-4 exercícios
- O treino principal deve ter 5-8 exercícios adaptados ao foco
- O desaquecimento deve ter 3-5 exercícios de alongamento
- Todas as orientações devem ser claras e específicas
- Adapte SEMPRE ao equipamento disponível (se "casa", use exercícios com peso corporal; se "academia", use equipamentos)
- Se houver limitações, substitua exercícios que possam agravar lesões
- Use português brasileiro

Retorne APENAS o JSON, sem markdown, sem ```json, sem explicações adicionais."#;

/// Instruction block sent to the generation service as `prompt`.
pub fn workout_prompt(request: &WorkoutRequest) -> String {
    let mut prompt = String::from(
        "Você é um especialista em educação física especializado no Método V.I.D.A. \
         (Vitalidade, Intensidade, Disciplina, Ação).\n\nINFORMAÇÕES DO USUÁRIO:\n",
    );

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "- Foco do treino: {}", request.focus);
    let _ = writeln!(prompt, "- Equipamento disponível: {}", request.equipment);
    if let Some(sex) = &request.sex {
        let _ = writeln!(prompt, "- Sexo: {}", sex.as_str());
    }
    if let Some(minutes) = &request.minutes_available {
        let _ = writeln!(prompt, "- Tempo disponível: {} minutos", minutes);
    }
    if let Some(limitations) = &request.limitations {
        let _ = writeln!(prompt, "- Limitações/Lesões: {}", limitations);
    }

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Sex;

    #[test]
    fn test_prompt_embeds_required_fields() {
        let prompt = workout_prompt(&WorkoutRequest::new("Perda de peso", "Casa"));

        assert!(prompt.contains("- Foco do treino: Perda de peso\n"));
        assert!(prompt.contains("- Equipamento disponível: Casa\n"));
        assert!(!prompt.contains("- Sexo:"));
        assert!(!prompt.contains("- Tempo disponível:"));
        assert!(prompt.ends_with("sem explicações adicionais."));
    }

    #[test]
    fn test_prompt_includes_optional_fields_when_present() {
        let request = WorkoutRequest {
            sex: Some(Sex::Male),
            minutes_available: Some("45".to_string()),
            limitations: Some("Dor no joelho".to_string()),
            ..WorkoutRequest::new("Hipertrofia", "Academia")
        };
        let prompt = workout_prompt(&request);

        assert!(prompt.contains("- Sexo: masculino"));
        assert!(prompt.contains("- Tempo disponível: 45 minutos"));
        assert!(prompt.contains("- Limitações/Lesões: Dor no joelho"));
    }
}
