use crate::scanning::*;

pub type NodeId = usize;

struct Node {
    token: Token,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    // Set on a subtree that came out of a closed parenthesis group; the
    // precedence walk must treat such a node like a literal.
    grouped: bool,
}

impl Node {
    fn new(token: Token) -> Self {
        Self {
            token,
            left: None,
            right: None,
            parent: None,
            grouped: false,
        }
    }
}

/// Builds an expression tree one token at a time, reshaping it so the tree
/// always honors operator precedence for the tokens seen so far. Parenthesis
/// nesting lives on an explicit context stack rather than the call stack.
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
    last_operator: Option<NodeId>,
    contexts: Vec<(NodeId, Option<NodeId>)>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Token::root)],
            root: 0,
            last_operator: None,
            contexts: Vec::new(),
        }
    }

    // The returned bool is only meaningful for close_paren: false means the
    // parenthesis had no matching scope and the tree is untouched.
    pub fn add(&mut self, token: Token) -> bool {
        match token {
            Token::root => panic!("the root sentinel cannot be added as a token"),
            Token::operator(Operator::equals) => {
                panic!("'=' drives completion and never enters the tree")
            }
            Token::literal(value) => {
                self.add_literal(value);
                true
            }
            Token::operator(operator) => {
                self.add_operator(operator);
                true
            }
            Token::open_paren => {
                self.open_scope();
                true
            }
            Token::close_paren => self.close_scope(),
        }
    }

    pub fn add_literal(&mut self, value: f64) {
        let node = self.fresh(Token::literal(value));
        self.attach_operand(node);
    }

    pub fn add_operator(&mut self, operator: Operator) {
        let precedence = operator.precedence();
        let node = self.fresh(Token::operator(operator));

        match self.last_operator {
            None => self.promote(node),
            Some(last) => {
                if precedence > self.operator_precedence(last) {
                    log::trace!("'{}' binds tighter, creeping down the right spine", operator.symbol());
                    let start = self.nodes[last]
                        .right
                        .expect("tighter-binding operator arrived before its operand");
                    let target = self.creep_down(start, precedence);
                    self.splice_above(target, node);
                } else {
                    log::trace!("'{}' binds looser, creeping up toward the root", operator.symbol());
                    let target = self.creep_up(last, precedence);
                    self.splice_above(target, node);
                }
            }
        }

        self.last_operator = Some(node);
    }

    pub fn open_scope(&mut self) {
        self.contexts.push((self.root, self.last_operator));
        self.root = self.fresh(Token::root);
        self.last_operator = None;
    }

    pub fn close_scope(&mut self) -> bool {
        let Some((outer_root, outer_last)) = self.contexts.pop() else {
            return false;
        };

        let inner = self.root;
        self.root = outer_root;
        self.last_operator = outer_last;

        let operand = match self.nodes[inner].token {
            // A scope that never saw an operator reduces to its single
            // operand; an empty () group counts as a zero literal.
            Token::root => match self.nodes[inner].left.take() {
                Some(single) => single,
                None => self.fresh(Token::literal(0.0)),
            },
            _ => {
                self.nodes[inner].grouped = true;
                inner
            }
        };

        self.nodes[operand].parent = None;
        self.attach_operand(operand);
        true
    }

    pub fn complete(&self) -> Option<NodeId> {
        if !self.contexts.is_empty() {
            return None;
        }
        match self.nodes[self.root].token {
            Token::root => self.nodes[self.root].left,
            _ => Some(self.root),
        }
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new(Token::root));
        self.root = 0;
        self.last_operator = None;
        self.contexts.clear();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn token(&self, id: NodeId) -> Token {
        self.nodes[id].token
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].right
    }

    pub fn render(&self, id: NodeId) -> String {
        let mut rendered = String::new();
        self.render_node(id, "", true, &mut rendered);
        rendered
    }

    fn attach_operand(&mut self, node: NodeId) {
        match self.last_operator {
            None => {
                // Before the first operator the root is still the sentinel
                // and holds at most the first operand on its left.
                if self.nodes[self.root].left.is_some() {
                    panic!("two operands in a row with no operator between them");
                }
                self.link_left(self.root, node);
            }
            Some(last) => {
                if self.nodes[last].left.is_none() {
                    self.link_left(last, node);
                } else if self.nodes[last].right.is_none() {
                    self.link_right(last, node);
                } else {
                    panic!("operand arrived while the last operator already has both");
                }
            }
        }
    }

    // First operator after the first operand: the sentinel hands over its
    // operand and is discarded.
    fn promote(&mut self, node: NodeId) {
        if let Some(operand) = self.nodes[self.root].left.take() {
            self.link_left(node, operand);
        }
        self.nodes[node].parent = None;
        self.root = node;
    }

    // Descend from the last operator's right child past anything that binds
    // looser, stopping at the first literal or grouped subtree.
    fn creep_down(&self, start: NodeId, precedence: i32) -> NodeId {
        let mut current = start;
        loop {
            let node = &self.nodes[current];
            match node.token {
                Token::operator(operator)
                    if !node.grouped && operator.precedence() < precedence =>
                {
                    current = node.left.expect("operator node lost its left operand");
                }
                _ => return current,
            }
        }
    }

    // Climb from the last operator while the ancestors bind strictly
    // tighter, stopping at the root or at a same-or-looser ancestor.
    fn creep_up(&self, start: NodeId, precedence: i32) -> NodeId {
        let mut current = start;
        while current != self.root {
            match self.nodes[current].token {
                Token::operator(operator) if operator.precedence() > precedence => {
                    current = self.nodes[current].parent.expect("non-root node lost its parent");
                }
                _ => break,
            }
        }
        current
    }

    // The new operator takes the target's place and the target becomes its
    // left operand; the right slot stays open for the next operand.
    fn splice_above(&mut self, target: NodeId, node: NodeId) {
        let old_parent = self.nodes[target].parent;
        self.link_left(node, target);
        match old_parent {
            None => {
                self.nodes[node].parent = None;
                self.root = node;
            }
            Some(parent) => {
                if self.nodes[parent].left == Some(target) {
                    self.nodes[parent].left = Some(node);
                } else {
                    self.nodes[parent].right = Some(node);
                }
                self.nodes[node].parent = Some(parent);
            }
        }
    }

    fn operator_precedence(&self, id: NodeId) -> i32 {
        match self.nodes[id].token {
            Token::operator(operator) => operator.precedence(),
            _ => panic!("the tracked last operator does not hold an operator token"),
        }
    }

    fn fresh(&mut self, token: Token) -> NodeId {
        self.nodes.push(Node::new(token));
        self.nodes.len() - 1
    }

    fn link_left(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].left = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    fn link_right(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].right = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    fn render_node(&self, id: NodeId, indent: &str, is_last: bool, rendered: &mut String) {
        let node = &self.nodes[id];
        rendered.push_str(indent);
        let deeper = if is_last {
            rendered.push_str("└── ");
            format!("{}    ", indent)
        } else {
            rendered.push_str("├── ");
            format!("{}│   ", indent)
        };
        rendered.push_str(&node.token.to_string());
        rendered.push('\n');

        let children: Vec<NodeId> = [node.left, node.right].into_iter().flatten().collect();
        for (index, child) in children.iter().enumerate() {
            self.render_node(*child, &deeper, index == children.len() - 1, rendered);
        }
    }
}
