//! Synthetic jurisprudence corpus used for demos and end-to-end tests.
//!
//! Sixteen distinct (forum, claim, outcome, decision) combinations, repeated
//! as a block [`SYNTHETIC_REPEATS`] times, so row `r` is combination `r % 16`.

use crate::case::Outcome::{Favorable as P, Unfavorable as I};
use crate::case::{CaseRecord, Outcome};

pub const SYNTHETIC_REPEATS: usize = 10;

const SP1: &str = "1ª Vara Cível de São Paulo";
const SP2: &str = "2ª Vara Cível de São Paulo";
const SSA2: &str = "2ª Vara do Consumidor de Salvador";
const SSA3: &str = "3ª Vara do Consumidor de Salvador";
const CWB1: &str = "1ª Vara Cível de Curitiba";

const NEGATIVACAO: &str = "Negativação indevida por dívida já paga";
const VICIO: &str = "Produto com vício oculto não sanado no prazo legal";
const TAXA: &str = "Cobrança de taxa de serviço não informada previamente";
const TELEFONIA: &str = "Falha na prestação de serviço de telefonia com cobrança indevida";
const ATRASO: &str = "Atraso na entrega de produto comprado online";

pub const COMBINATIONS: [(&str, &str, Outcome, &str); 16] = [
    (
        SP1,
        NEGATIVACAO,
        P,
        "JULGO PROCEDENTE o pedido para declarar a inexigibilidade do débito e condenar a ré ao pagamento de indenização por danos morais no valor de R$ 10.000,00, uma vez que a inscrição em cadastro de inadimplentes se deu por dívida comprovadamente quitada.",
    ),
    (
        SP2,
        VICIO,
        P,
        "Acolho o pedido do autor, com base no Art. 18 do CDC, para determinar a substituição do produto por outro da mesma espécie, em perfeitas condições de uso, visto que o vício não foi sanado no prazo de 30 dias.",
    ),
    (
        SSA3,
        TAXA,
        I,
        "JULGO IMPROCEDENTE o pedido, pois a taxa de serviço estava prevista em contrato de adesão, sendo de conhecimento prévio do consumidor. Não há que se falar em abusividade.",
    ),
    (
        CWB1,
        TELEFONIA,
        P,
        "É procedente o pedido de repetição de indébito em dobro, bem como a condenação por danos morais, fixados em R$ 5.000,00, dada a falha na prestação do serviço e a cobrança por serviço não contratado.",
    ),
    (
        SSA2,
        ATRASO,
        P,
        "Condeno a ré a indenizar o autor por danos materiais e morais, estes fixados em R$ 3.000,00, pelo atraso injustificado na entrega do produto, que ultrapassou o prazo prometido em 45 dias.",
    ),
    (
        SP1,
        NEGATIVACAO,
        P,
        "Diante da comprovação do pagamento anterior à negativação, declaro a inexigibilidade da dívida e condeno a empresa ré ao pagamento de R$ 8.000,00 a título de danos morais.",
    ),
    (
        CWB1,
        VICIO,
        I,
        "A preliminar de decadência é acolhida, pois o autor reclamou do vício oculto após o prazo legal. JULGO IMPROCEDENTE a demanda.",
    ),
    (
        SSA3,
        ATRASO,
        P,
        "O mero atraso na entrega, sem maiores consequências, configura mero aborrecimento. Pedido de danos morais improcedente. Condeno apenas à entrega do produto.",
    ),
    (
        SP2,
        TELEFONIA,
        I,
        "Não restou comprovada a falha na prestação do serviço, sendo as cobranças devidas. JULGO IMPROCEDente o pleito autoral.",
    ),
    (
        SP1,
        NEGATIVACAO,
        P,
        "A inscrição indevida do nome do consumidor nos órgãos de proteção ao crédito gera dano moral in re ipsa. Condeno a ré em R$ 12.000,00.",
    ),
    (
        CWB1,
        TAXA,
        P,
        "A cobrança foi devidamente informada no momento da contratação. JULGO PROCEDENTE o pedido de devolução simples, afastando os danos morais.",
    ),
    (
        SSA2,
        VICIO,
        P,
        "O fornecedor não sanou o vício no prazo legal. Conforme o Art. 18 do CDC, determino a restituição imediata da quantia paga. Danos morais procedentes, fixados em R$ 4.000,00.",
    ),
    (
        SP1,
        ATRASO,
        I,
        "Apesar do atraso, o produto foi entregue e não se demonstrou prejuízo excepcional. JULGO IMPROCEDENTE o pedido de danos morais.",
    ),
    (
        SSA3,
        TAXA,
        P,
        "A informação sobre a taxa foi clara e expressa no ato da contratação. Improcedente.",
    ),
    (
        SP2,
        TELEFONIA,
        P,
        "Restou configurada a falha na prestação do serviço, com cobranças por mais de 3 meses. Condeno a ré a restituir em dobro os valores e a pagar R$ 6.000,00 por danos morais.",
    ),
    (
        CWB1,
        NEGATIVACAO,
        I,
        "A ré não apresentou prova da origem da dívida que gerou a negativação. Declaro a inexigibilidade do débito e condeno a ré em danos morais de R$ 7.500,00.",
    ),
];

/// Build the synthetic corpus: every combination repeated `repeats` times, in block order.
pub fn synthetic_corpus(repeats: usize) -> Vec<CaseRecord> {
    (0..repeats)
        .flat_map(|_| COMBINATIONS.iter())
        .map(|&(forum, claim, outcome, decision)| CaseRecord::new(forum, claim, outcome, decision))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::distinct_forums;

    #[test]
    fn default_corpus_has_160_rows() {
        let corpus = synthetic_corpus(SYNTHETIC_REPEATS);
        assert_eq!(corpus.len(), 160);
        assert!(corpus.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn rows_cycle_through_combinations() {
        let corpus = synthetic_corpus(2);
        assert_eq!(corpus[0], corpus[16]);
        assert_eq!(corpus[15].forum, CWB1);
        assert_eq!(corpus[15].outcome, Outcome::Unfavorable);
    }

    #[test]
    fn five_forums_both_outcomes() {
        let corpus = synthetic_corpus(1);
        assert_eq!(distinct_forums(&corpus).len(), 5);
        let favorable = corpus.iter().filter(|r| r.outcome.is_favorable()).count();
        assert_eq!(favorable, 11);
    }
}
